use indicatif::ProgressStyle;

const NUMBER_TEMPLATE: &str = "{spinner} {msg:20} {wide_bar:} {pos:>4}/{len}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn number_bar() -> ProgressStyle {
        ProgressStyle::with_template(NUMBER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
    }
}
