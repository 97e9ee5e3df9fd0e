use anyhow::Result;

/// Logs to the terminal, e.g. when rendering on a server.
/// Lines from any target containing one of `ignore` are dropped.
pub fn init(level: log::LevelFilter, ignore: &[&'static str]) -> Result<()> {
	use simplelog::*;
	let cfg = {
		let mut builder = ConfigBuilder::new();
		builder
			.set_max_level(log::LevelFilter::Error)
			.set_time_format_custom(format_description!("[hour]:[minute]:[second].[subsecond digits:3]"))
			// Pads the names of levels so that they line up in the log.
			.set_level_padding(LevelPadding::Left)
			// Target is always logged so that readers know what owner logged each line
			.set_target_level(log::LevelFilter::Error)
			.set_location_level(log::LevelFilter::Off);
		for str in ignore.iter() {
			builder.add_filter_ignore_str(str);
		}
		builder.build()
	};
	TermLogger::init(level, cfg, TerminalMode::Stderr, ColorChoice::Auto)?;
	log::debug!("Logging at {level}");
	Ok(())
}
