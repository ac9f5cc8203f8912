// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Something an info dialog can describe: a display name plus labelled
/// fields in presentation order.
pub trait Details {
    fn name(&self) -> &str;
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// One `label: value` line per field, labels padded to a common width.
pub fn format_details(item: &dyn Details) -> String {
    let fields = item.fields();
    let width = fields
        .iter()
        .map(|(label, _)| label.chars().count() + 1)
        .max()
        .unwrap_or(0);
    fields
        .into_iter()
        .map(|(label, value)| format!("{:<width$} {value}", format!("{label}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{Details, format_details};

    struct Plugin;

    impl Details for Plugin {
        fn name(&self) -> &str {
            "lint"
        }

        fn fields(&self) -> Vec<(&'static str, String)> {
            vec![("version", "1.2.0".to_owned()), ("id", "p-7".to_owned())]
        }
    }

    #[test]
    fn labels_are_padded_to_the_widest() {
        assert_eq!(format_details(&Plugin), "version: 1.2.0\nid:      p-7");
    }

    #[test]
    fn no_fields_formats_empty() {
        struct Bare;
        impl Details for Bare {
            fn name(&self) -> &str {
                "bare"
            }
            fn fields(&self) -> Vec<(&'static str, String)> {
                Vec::new()
            }
        }
        assert_eq!(Bare.name(), "bare");
        assert_eq!(format_details(&Bare), "");
    }
}
