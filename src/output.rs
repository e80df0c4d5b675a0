use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::location::TestLocation;
use crate::module_info::ModuleInfo;

/// Plain-text rendering used by `--format text`.
pub trait TextOutput {
    fn to_text(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathOutput {
    pub path: String,
}

impl TextOutput for PathOutput {
    fn to_text(&self) -> String {
        self.path.clone()
    }
}

impl TextOutput for ModuleInfo {
    fn to_text(&self) -> String {
        format!(
            "module_path: {}\nmodule_dir: {}\nroot_dir: {}",
            self.module_path, self.module_dir, self.root_dir
        )
    }
}

impl TextOutput for TestLocation {
    fn to_text(&self) -> String {
        self.relative_file.clone()
    }
}

pub fn render<T: Serialize + TextOutput>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(value.to_text()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_render_module_info_text() {
        let info = ModuleInfo {
            module_path: "example.com/m".to_string(),
            module_dir: "/src/m".to_string(),
            root_dir: String::new(),
        };
        assert_eq!(
            render(&info, OutputFormat::Text).unwrap(),
            "module_path: example.com/m\nmodule_dir: /src/m\nroot_dir: "
        );
    }

    #[test]
    fn test_render_module_info_json() {
        let info = ModuleInfo::default();
        let json: serde_json::Value =
            serde_json::from_str(&render(&info, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["module_path"], "");
        assert_eq!(json["module_dir"], "");
        assert_eq!(json["root_dir"], "");
    }

    #[test]
    fn test_render_test_location() {
        let location = TestLocation {
            file: PathBuf::from("/src/m/pkg/a_test.go"),
            relative_file: "m/pkg/a_test.go".to_string(),
            found: true,
        };
        assert_eq!(
            render(&location, OutputFormat::Text).unwrap(),
            "m/pkg/a_test.go"
        );

        let json: serde_json::Value =
            serde_json::from_str(&render(&location, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["file"], "/src/m/pkg/a_test.go");
    }

    #[test]
    fn test_render_path_output() {
        let output = PathOutput {
            path: "b/c".to_string(),
        };
        assert_eq!(render(&output, OutputFormat::Text).unwrap(), "b/c");
        assert_eq!(
            render(&output, OutputFormat::Json).unwrap(),
            "{\n  \"path\": \"b/c\"\n}"
        );
    }
}
