/// Split a line into its leading run of spaces/tabs and the remaining content.
///
/// The caller strips the trailing newline.
pub fn split_indentation(line: &str) -> (&str, &str) {
    let content = line.trim_start_matches([' ', '\t']);
    line.split_at(line.len() - content.len())
}
