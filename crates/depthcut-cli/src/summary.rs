use std::path::Path;

use console::Style;
use depthcut_core::pipeline::RunSummary;
use depthcut_core::segment::{SegmentationConfig, Strategy};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warn: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warn: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_config(config: &SegmentationConfig, input: &Path, output: &Path, device_name: &str) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Depthcut"));
    println!("  {}", s.title.apply_to("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}"));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Input"), s.path.apply_to(input.display()));
    println!("  {:<14}{}", s.label.apply_to("Output"), s.path.apply_to(output.display()));
    println!("  {:<14}{}", s.label.apply_to("Device"), s.method.apply_to(device_name));
    println!();

    println!("  {}", s.header.apply_to("Segmentation"));
    println!("    {:<12}{}", s.label.apply_to("Strategy"), s.method.apply_to(config.strategy));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Clip"),
        s.value.apply_to(format!("{} m", config.clipping_distance))
    );
    match config.strategy {
        Strategy::Clip => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Fill"),
                s.value.apply_to(format!("0x{:02X}", config.background_fill))
            );
        }
        Strategy::Closest => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Slot"),
                s.value.apply_to(format!("{} units", 1u32 << config.slot_shift))
            );
            if config.mark_centroid {
                println!("    {:<12}{}", s.label.apply_to("Centroid"), s.value.apply_to("marked"));
            } else {
                println!("    {:<12}{}", s.label.apply_to("Centroid"), s.disabled.apply_to("off"));
            }
        }
        Strategy::Refine => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Near/Far"),
                s.value.apply_to(format!("{}/{}", config.near_threshold, config.far_threshold))
            );
            println!("    {:<12}{}", s.label.apply_to("Closing"), s.value.apply_to(config.erosion_size));
            println!(
                "    {:<12}{}",
                s.label.apply_to("Iterations"),
                s.value.apply_to(config.refine_iterations)
            );
        }
    }
    if config.warmup_frames == 0 {
        println!("    {:<12}{}", s.label.apply_to("Warm-up"), s.disabled.apply_to("none"));
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Warm-up"),
            s.value.apply_to(format!("{} frames", config.warmup_frames))
        );
    }
    println!();
}

pub fn print_run_summary(summary: &RunSummary, output: &Path) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Summary"));
    println!("    {:<16}{}", s.label.apply_to("Processed"), s.value.apply_to(summary.processed));
    if summary.skipped == 0 {
        println!("    {:<16}{}", s.label.apply_to("Skipped"), s.disabled.apply_to("none"));
    } else {
        println!("    {:<16}{}", s.label.apply_to("Skipped"), s.warn.apply_to(summary.skipped));
    }
    if summary.refine_failures > 0 {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Refine failures"),
            s.warn.apply_to(summary.refine_failures)
        );
    }
    if summary.profile_changes > 0 {
        println!(
            "    {:<16}{}",
            s.label.apply_to("Profile changes"),
            s.value.apply_to(summary.profile_changes)
        );
    }
    println!();
    println!("  Output saved to {}", s.path.apply_to(output.display()));
}
