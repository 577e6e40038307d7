pub mod csv;
pub mod image_io;
pub mod recording;
pub mod recording_writer;

pub use csv::{save_metadata_csv, write_metadata_csv};
pub use recording::{RecordingHeader, RecordingReader};
pub use recording_writer::RecordingWriter;
