//! Convenience macros for the toolbelt.

/// Log an event with the given level, tagged with the calling module.
///
/// # Examples
///
/// ```
/// use qntmex_core::log_event;
/// use qntmex_core::utils::LogLevel;
///
/// log_event!(LogLevel::Info, "Patched gradle.properties");
///
/// log_event!(LogLevel::Debug, "Rule applied",
///     rule => "strip-jvm-arg",
///     path => "android/gradle.properties",
/// );
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:expr, $message:expr) => {
        {
            use $crate::utils::LogLevel;
            match $level {
                LogLevel::Error => log::error!("[{}] {}", module_path!(), $message),
                LogLevel::Warning => log::warn!("[{}] {}", module_path!(), $message),
                LogLevel::Info => log::info!("[{}] {}", module_path!(), $message),
                LogLevel::Debug => log::debug!("[{}] {}", module_path!(), $message),
                LogLevel::Trace => log::trace!("[{}] {}", module_path!(), $message),
            }
        }
    };

    ($level:expr, $message:expr, $($key:ident => $value:expr),+ $(,)?) => {
        {
            use $crate::utils::LogLevel;
            let metadata = vec![$(format!("{}={}", stringify!($key), $value)),+].join(" ");
            match $level {
                LogLevel::Error => log::error!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Warning => log::warn!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Info => log::info!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Debug => log::debug!("[{}] {}: {}", module_path!(), $message, metadata),
                LogLevel::Trace => log::trace!("[{}] {}: {}", module_path!(), $message, metadata),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::utils::LogLevel;

    #[test]
    fn test_log_event_expands_for_every_level() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
        ] {
            log_event!(level, "message");
            log_event!(level, "message", path => "a/b", count => 2);
        }
    }
}
