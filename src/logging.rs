use std::path::PathBuf;
use std::time::SystemTime;

use color_eyre::{Result, eyre::Context};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Console sink on stderr at `level`, plus an uncoloured file sink at
/// `file_level` when `log_file` is set.
pub fn setup_logging(
    level: LevelFilter,
    log_file: Option<PathBuf>,
    file_level: LevelFilter,
    sql_echo: bool,
) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);

    let console = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {} {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    let sql_level = sql_level(sql_echo);
    let mut dispatch = fern::Dispatch::new()
        .level_for("sqlx", sql_level)
        .level_for("sea_orm", sql_level)
        .level_for("sea_orm_migration", sql_level)
        .chain(console);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).context(format!(
                "Failed to create log directory: {}",
                parent.display()
            ))?;
        }

        let file = fern::log_file(&path)
            .context(format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} {:<5} {} {}",
                        humantime::format_rfc3339_millis(SystemTime::now()),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(file_level)
                .chain(file),
        );
    }

    dispatch.apply().context("Failed to install logger")?;
    Ok(())
}

fn sql_level(sql_echo: bool) -> LevelFilter {
    if sql_echo {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_is_quiet_unless_echoed() {
        assert_eq!(sql_level(false), LevelFilter::Warn);
        assert_eq!(sql_level(true), LevelFilter::Info);
    }
}
