use colored::*;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Installs the global logger: `[timestamp] [LEVEL] message`, level colored.
///
/// `RUST_LOG` still wins over the default filter.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp().to_string();
            writeln!(buf, "[{}] [{}] {}", timestamp, colored_level(record.level()), record.args())
        })
        .init();
}

fn colored_level(level: Level) -> ColoredString {
    let label = level.to_string();
    match level {
        Level::Error => label.red(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.white(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_label_text_is_kept() {
        colored::control::set_override(false);
        assert_eq!(colored_level(Level::Warn).to_string(), "WARN");
        assert_eq!(colored_level(Level::Error).to_string(), "ERROR");
    }
}
