/// Summary card for an editor library: where to find it, what it costs and
/// how it compares
#[derive(Debug, Clone, PartialEq)]
pub struct EditorProfile {
    pub name: &'static str,
    pub url: &'static str,
    pub pricing: &'static str,
    pub license: &'static str,
    pub summary: &'static str,
    pub pros: &'static [&'static str],
    pub cons: &'static [&'static str],
}

impl EditorProfile {
    pub fn editor_js() -> Self {
        Self {
            name: "Editor.js",
            url: "https://editorjs.io/",
            pricing: "Free",
            license: "Apache-2.0 License",
            summary: "A block-styled editor with clean JSON output. \
                      Each block is an independent content unit supported by individual tools.",
            pros: &[
                "Block-based editing approach",
                "JSON output format",
                "Extensible plugin system",
                "Clean and modern UI",
                "API-first design",
            ],
            cons: &[
                "Requires plugins for basic formatting",
                "Limited built-in features",
                "Different paradigm from traditional RTEs",
                "Smaller community",
                "Learning curve for block-based editing",
                "Plugin ecosystem still growing",
            ],
        }
    }

    /// Plain text rendering of the card
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.name.to_string(),
            self.summary.to_string(),
            String::new(),
            format!("Website: {}", self.url),
            format!("Pricing: {}", self.pricing),
            format!("License: {}", self.license),
            String::new(),
            "Pros:".to_string(),
        ];
        lines.extend(self.pros.iter().map(|pro| format!("  + {pro}")));
        lines.push(String::new());
        lines.push("Cons:".to_string());
        lines.extend(self.cons.iter().map(|con| format!("  - {con}")));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_js_card() {
        let profile = EditorProfile::editor_js();
        assert_eq!(profile.pros.len(), 5);
        assert_eq!(profile.cons.len(), 6);

        let lines = profile.to_lines();
        assert_eq!(lines[0], "Editor.js");
        assert!(lines.contains(&"License: Apache-2.0 License".to_string()));
        assert!(lines.contains(&"  - Smaller community".to_string()));
    }
}
