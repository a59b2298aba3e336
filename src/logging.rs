#[cfg(feature = "logging")]
pub fn init_logger(
    min_level: log::LevelFilter, debug_file_name: &std::ffi::OsStr,
) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            // UTC only: the local offset can't be read safely once the sampler thread exists.
            let now = time::OffsetDateTime::now_utc();
            let stamp = now
                .format(&time::macros::format_description!(
                    "[[[year]-[month]-[day]][[[hour]:[minute]:[second][subsecond digits:6]]"
                ))
                .unwrap_or_default();

            out.finish(format_args!(
                "{}[{}][{}] {}",
                stamp,
                record.target(),
                record.level(),
                message
            ))
        })
        .level(min_level)
        // sysinfo and crossterm are chatty at debug
        .level_for("sysinfo", log::LevelFilter::Warn)
        .level_for("crossterm", log::LevelFilter::Warn)
        .chain(fern::log_file(debug_file_name)?)
        .apply()?;

    Ok(())
}
