//! File naming shared by the exporters.

/// Replaces every character that is not an ASCII letter or digit with `_`.
///
/// ```
/// use garagelayout_core::files::sanitize_file_name;
/// assert_eq!(sanitize_file_name("Main St. Garage"), "Main_St__Garage");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_alphanumerics() {
        assert_eq!(sanitize_file_name("Entry1"), "Entry1");
        assert_eq!(sanitize_file_name("Lot B/2"), "Lot_B_2");
        assert_eq!(sanitize_file_name("Café"), "Caf_");
        assert_eq!(sanitize_file_name(""), "");
    }
}
