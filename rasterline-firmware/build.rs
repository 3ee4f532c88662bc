//! Build script for rasterline-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time
//! - Generates display_config.rs constants from display.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// RAM budget for the frame buffer (the rest is stacks and statics)
const MAX_FRAME_BYTES: i64 = 192 * 1024;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml configuration at compile time
fn validate_config() -> toml::Value {
    // Re-run if display.toml changes
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a display.toml configuration file.        ║\n\
            ║  Please create one in the rasterline-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in display.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_frame(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_pacer(&config, &mut errors);
    validate_counter(&config, &mut errors);
    validate_snake(&config, &mut errors);

    if !errors.is_empty() {
        let error_lines: Vec<String> = errors.iter().map(|e| format!("║  • {:<62} ║", e)).collect();
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: display.toml validation failed                           ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            error_lines.join("\n")
        );
    }

    println!("cargo:warning=display.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read an integer from `[section] key`
fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Read a required integer in `min..=max`, recording an error otherwise
fn ranged(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match int(config, section, key) {
        Some(value) if (min..=max).contains(&value) => Some(value),
        Some(value) => {
            errors.push(format!(
                "[{}] {} = {} (must be {}..={})",
                section, key, value, min, max
            ));
            None
        }
        None => {
            errors.push(format!("[{}] {} missing or not an integer", section, key));
            None
        }
    }
}

fn validate_frame(config: &toml::Value, errors: &mut Vec<String>) {
    let width = ranged(config, "frame", "width", 2, 1024, errors);
    let height = ranged(config, "frame", "height", 1, 1024, errors);
    let depth = ranged(config, "frame", "ready_depth", 1, 1024, errors);

    if let Some(width) = width {
        // Two pixels per PIO FIFO word
        if width % 2 != 0 {
            errors.push(format!("[frame] width = {} must be even", width));
        }
    }
    if let (Some(width), Some(height)) = (width, height) {
        let bytes = width * height * 2;
        if bytes > MAX_FRAME_BYTES {
            errors.push(format!(
                "[frame] {}x{} needs {} bytes (max {})",
                width, height, bytes, MAX_FRAME_BYTES
            ));
        }
    }
    if let (Some(height), Some(depth)) = (height, depth) {
        if depth > height {
            errors.push(format!(
                "[frame] ready_depth = {} exceeds height = {}",
                depth, height
            ));
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    match config.get("timing").and_then(|t| t.get("label")).and_then(|l| l.as_str()) {
        Some(label) if label.len() > 16 => {
            errors.push(format!("[timing] label '{}' longer than 16 chars", label))
        }
        Some(_) => {}
        None => errors.push("[timing] label missing".to_string()),
    }

    let pixel = ranged(config, "timing", "pixel_clock_khz", 1, 200_000, errors);
    let bit = ranged(config, "timing", "bit_clock_khz", 1, 400_000, errors);
    let h_active = ranged(config, "timing", "h_active", 1, 4096, errors);
    ranged(config, "timing", "v_active", 1, 4096, errors);

    // The scan-out state machine spends 2 system cycles per frame pixel
    if let (Some(pixel), Some(bit), Some(h_active), Some(width)) =
        (pixel, bit, h_active, int(config, "frame", "width"))
    {
        let frame_pixel_khz = pixel * width / h_active;
        if bit < frame_pixel_khz * 2 {
            errors.push(format!(
                "[timing] bit clock {} kHz cannot drive {} kHz frame pixels",
                bit, frame_pixel_khz
            ));
        }
    }
}

fn validate_pacer(config: &toml::Value, errors: &mut Vec<String>) {
    let short = ranged(config, "pacer", "short_interval_us", 1, 1_000_000, errors);
    let long = ranged(config, "pacer", "long_interval_us", 1, 1_000_000, errors);
    ranged(config, "pacer", "sample_every", 0, u32::MAX as i64, errors);

    if let (Some(short), Some(long)) = (short, long) {
        if short > long {
            errors.push(format!(
                "[pacer] short_interval_us = {} exceeds long_interval_us = {}",
                short, long
            ));
        }
    }
}

fn validate_counter(config: &toml::Value, errors: &mut Vec<String>) {
    let ceiling = ranged(config, "counter", "ceiling", 1, u32::MAX as i64, errors);
    let restart = ranged(config, "counter", "restart", 0, u32::MAX as i64, errors);

    if let (Some(ceiling), Some(restart)) = (ceiling, restart) {
        if restart >= ceiling {
            errors.push(format!(
                "[counter] restart = {} must be below ceiling = {}",
                restart, ceiling
            ));
        }
    }
}

fn validate_snake(config: &toml::Value, errors: &mut Vec<String>) {
    ranged(config, "snake", "block_size", 1, 64, errors);
    ranged(config, "snake", "move_every_frames", 1, 3600, errors);
    ranged(config, "snake", "seed", 0, i64::MAX, errors);
}

/// Write display_config.rs into OUT_DIR
fn generate_constants(config: &toml::Value) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let get = |section: &str, key: &str| int(config, section, key).unwrap_or_default();
    let label = config
        .get("timing")
        .and_then(|t| t.get("label"))
        .and_then(|l| l.as_str())
        .unwrap_or_default();

    let mut out = String::new();
    out.push_str("// Generated by build.rs from display.toml\n\n");
    let mut constant = |name: &str, ty: &str, value: i64| {
        out.push_str(&format!("pub const {}: {} = {};\n", name, ty, value));
    };

    constant("FRAME_WIDTH", "usize", get("frame", "width"));
    constant("FRAME_HEIGHT", "usize", get("frame", "height"));
    constant("READY_DEPTH", "usize", get("frame", "ready_depth"));
    constant("PIXEL_CLOCK_KHZ", "u32", get("timing", "pixel_clock_khz"));
    constant("BIT_CLOCK_KHZ", "u32", get("timing", "bit_clock_khz"));
    constant("H_ACTIVE", "u16", get("timing", "h_active"));
    constant("V_ACTIVE", "u16", get("timing", "v_active"));
    constant("SHORT_INTERVAL_US", "u32", get("pacer", "short_interval_us"));
    constant("LONG_INTERVAL_US", "u32", get("pacer", "long_interval_us"));
    constant("SAMPLE_EVERY", "u32", get("pacer", "sample_every"));
    constant("COUNTER_CEILING", "u32", get("counter", "ceiling"));
    constant("COUNTER_RESTART", "u32", get("counter", "restart"));
    constant("SNAKE_BLOCK_SIZE", "u16", get("snake", "block_size"));
    constant("SNAKE_MOVE_EVERY_FRAMES", "u32", get("snake", "move_every_frames"));
    constant("SNAKE_SEED", "u64", get("snake", "seed"));
    out.push_str(&format!("pub const TIMING_LABEL: &str = {:?};\n", label));

    fs::write(out_dir.join("display_config.rs"), out).unwrap();
}
