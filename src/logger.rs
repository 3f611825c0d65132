use std::io::Write;

/// Routes `log` records to stderr. The level comes from `IMT_LOG`, `info`
/// by default. `info` records print as bare lines, every other level is
/// prefixed with its name.
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or("IMT_LOG", log::LevelFilter::Info.to_string())
            .write_style("IMT_LOG_STYLE"),
    )
    .filter_module("swc_ecma_parser", log::LevelFilter::Error)
    .filter_module("reqwest", log::LevelFilter::Warn)
    .filter_module("hyper", log::LevelFilter::Warn)
    .format(|buf, record| {
        if record.level() == log::Level::Info {
            writeln!(buf, "{}", record.args())
        } else {
            writeln!(
                buf,
                "{}: {}",
                record.level().as_str().to_lowercase(),
                record.args()
            )
        }
    })
    .init();
}
