//! `svgmaker init`: write a commented default configuration.

use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

use crate::config::{Config, PotraceConfig, SheetConfig, StyleConfig, TraceConfig};
use crate::log;

/// Default config filename.
pub const CONFIG_FILE: &str = "svgmaker.toml";

/// Write `svgmaker.toml` into the config root, or print it with `--dry`.
pub fn new_config(config: &Config, dry_run: bool) -> Result<()> {
    if dry_run {
        print!("{}", generate_config_template());
        return Ok(());
    }

    let path = write_config(config.get_root())?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

/// Render every section with its default values and a short comment.
pub fn generate_config_template() -> String {
    let style = StyleConfig::default();
    let trace = TraceConfig::default();
    let potrace = PotraceConfig::default();
    let sheet = SheetConfig::default();
    let command = potrace
        .command
        .iter()
        .map(|arg| format!("{arg:?}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# svgmaker configuration file (v{version})

[style]
stroke_width = {stroke_width:?}     # 0 to 10
fill = "{fill}"        # hex color
stroke = "{stroke}"      # hex color
opacity = {opacity:?}          # 0 to 1 in steps of 0.1

[trace]
output_size = {output_size}      # longest raster edge before tracing, 32 to 1024 in steps of 32
output_dir = "{output_dir}"
jobs = {jobs}                # worker threads, 0 = one per CPU
preview = {preview}          # write preview.html next to the traced icons
timeout = {timeout}            # seconds per potrace call

[trace.potrace]
command = [{command}]
turdsize = {turdsize}
alphamax = {alphamax:?}
opttolerance = {opttolerance:?}
unit = {unit}

[sheet]
columns = {columns}              # 1 to 10
padding = {padding:?}           # 0 to 50
background = "{background}"
width = {width:?}            # 100 to 2000
transparent = {transparent}
# output = "sheet.svg"   # default: a temporary file
"#,
        version = env!("CARGO_PKG_VERSION"),
        stroke_width = style.stroke_width,
        fill = style.fill,
        stroke = style.stroke,
        opacity = style.opacity,
        output_size = trace.output_size,
        output_dir = trace.output_dir.display(),
        jobs = trace.jobs,
        preview = trace.preview,
        timeout = trace.timeout,
        turdsize = potrace.turdsize,
        alphamax = potrace.alphamax,
        opttolerance = potrace.opttolerance,
        unit = potrace.unit,
        columns = sheet.columns,
        padding = sheet.padding,
        background = sheet.background,
        width = sheet.width,
        transparent = sheet.transparent,
    )
}

/// Write the default config into `root`, refusing to overwrite.
pub fn write_config(root: &Path) -> Result<std::path::PathBuf> {
    let path = root.join(CONFIG_FILE);
    if path.exists() {
        bail!(
            "'{}' already exists.\nRemove it first, or use `svgmaker init --dry` to print the template.",
            path.display()
        );
    }

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create directory '{}'", root.display()))?;
    fs::write(&path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    Ok(path)
}
