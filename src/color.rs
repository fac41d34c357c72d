use supports_color::Stream;

/// Whether log lines written to stderr should carry ANSI colours.
pub fn stderr_supports_colors() -> bool {
    supports_color::on(Stream::Stderr).is_some()
}
