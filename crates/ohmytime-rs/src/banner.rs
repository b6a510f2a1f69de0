//! Startup banner and build metadata.

use ohmytime_protocol::BuildInfo;

const GRAFFITI: &str = r"
       _                      _    _
  ___ | |__   _ __ ___  _   _| |_ (_)_ __ ___   ___
 / _ \| '_ \ | '_ ` _ \| | | | __|| | '_ ` _ \ / _ \
| (_) | | | || | | | | | |_| | |_ | | | | | | |  __/
 \___/|_| |_||_| |_| |_|\__, |\__||_|_| |_| |_|\___|
                        |___/
";

/// Build metadata of this binary.
///
/// `OHMYTIME_BUILD_TAG` and `OHMYTIME_BUILD_TIME` may be set at compile time
/// by release pipelines.
pub fn build_info() -> BuildInfo {
    let tag = option_env!("OHMYTIME_BUILD_TAG")
        .map(str::to_string)
        .unwrap_or_else(|| format!("v{}", env!("CARGO_PKG_VERSION")));
    BuildInfo {
        tag,
        time: option_env!("OHMYTIME_BUILD_TIME")
            .unwrap_or_default()
            .to_string(),
        ..BuildInfo::default()
    }
}

/// Render the banner printed before logging starts.
pub fn render(build: &BuildInfo) -> String {
    format!(
        "{GRAFFITI}\nversion: {}\nbuild time: {}\ntg: {}\ngithub: {}\n",
        build.tag, build.time, build.bot_url, build.source_url
    )
}
