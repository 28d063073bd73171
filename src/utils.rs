/// `Debug` formatter that prints `...` instead of the value. Keeps API keys out of logged configs.
pub fn mask_fmt<T>(_: &T, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str("...")
}
