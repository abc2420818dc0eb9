//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use mosdeps_ops::{ConfigReport, OperationResult, PlatformInfo, PlatformStatus, SetupReport};
use mosdeps_types::Platform;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool) -> Self {
        Self { json_output }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            let json = result.to_json().map_err(io::Error::other)?;
            println!("{json}");
            return Ok(());
        }

        match result {
            OperationResult::Setup(report) => render_setup(report),
            OperationResult::Config(report) => render_config(report),
            OperationResult::Status(status) => render_status(status),
            OperationResult::Platform(info) => render_platform(info),
            OperationResult::Reset(platforms) => render_reset(platforms),
        }
        Ok(())
    }
}

fn render_setup(report: &SetupReport) {
    if report.already_installed {
        println!("Nothing to do, packages for {} are installed.", report.target);
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Package").add_attribute(Attribute::Bold),
        Cell::new("Platform").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Location").add_attribute(Attribute::Bold),
    ]);

    let mut rows = 0;
    for platform in &report.platforms {
        for package in &platform.packages {
            rows += 1;
            let status = if package.skipped {
                Cell::new("present").fg(Color::Yellow)
            } else {
                Cell::new(format!("installed ({} files)", package.files)).fg(Color::Green)
            };
            table.add_row(vec![
                Cell::new(&package.name),
                Cell::new(platform.platform),
                status,
                Cell::new(package.install_path.display()),
            ]);
        }
    }

    if rows == 0 {
        println!("No packages declared for {}.", report.target);
    } else {
        println!("{table}");
    }
}

fn render_config(report: &ConfigReport) {
    println!("Wrote {}", report.path.display());
    for path in &report.include_paths {
        println!("  {path}");
    }
}

fn render_status(status: &[PlatformStatus]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Platform").add_attribute(Attribute::Bold),
        Cell::new("Installed").add_attribute(Attribute::Bold),
        Cell::new("Marker").add_attribute(Attribute::Bold),
    ]);

    for entry in status {
        let installed = if entry.installed {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no").fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(entry.platform),
            installed,
            Cell::new(entry.marker.display()),
        ]);
    }

    println!("{table}");
}

fn render_platform(info: &PlatformInfo) {
    if info.platform.is_concrete() {
        println!("{} ({})", info.platform, info.raw);
    } else {
        println!("unknown platform \"{}\", all platforms apply", info.raw);
    }
}

fn render_reset(platforms: &[Platform]) {
    if platforms.is_empty() {
        println!("No install markers to clear.");
        return;
    }
    let names: Vec<_> = platforms.iter().map(|p| p.name()).collect();
    println!("Cleared install markers: {}", names.join(", "));
}
