//! XML property list rendering for launchd job definitions.

use crate::domain::model::ServiceDefinition;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
"#;

const FOOTER: &str = "</dict>\n</plist>\n";

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn push_key(out: &mut String, indent: &str, key: &str) {
    out.push_str(&format!("{}<key>{}</key>\n", indent, escape(key)));
}

fn push_string(out: &mut String, indent: &str, key: &str, value: &str) {
    push_key(out, indent, key);
    out.push_str(&format!("{}<string>{}</string>\n", indent, escape(value)));
}

fn push_bool(out: &mut String, indent: &str, key: &str, value: bool) {
    push_key(out, indent, key);
    out.push_str(&format!("{}<{}/>\n", indent, value));
}

pub fn render(definition: &ServiceDefinition) -> String {
    let indent = "\t";
    let mut out = String::from(HEADER);

    push_string(&mut out, indent, "Label", &definition.label);

    push_key(&mut out, indent, "ProgramArguments");
    out.push_str("\t<array>\n");
    for arg in &definition.program_arguments {
        out.push_str(&format!("\t\t<string>{}</string>\n", escape(arg)));
    }
    out.push_str("\t</array>\n");

    push_bool(&mut out, indent, "RunAtLoad", definition.run_at_load);
    push_bool(&mut out, indent, "KeepAlive", definition.keep_alive);

    if let Some(dir) = &definition.working_directory {
        push_string(&mut out, indent, "WorkingDirectory", dir);
    }

    if !definition.environment.is_empty() {
        push_key(&mut out, indent, "EnvironmentVariables");
        out.push_str("\t<dict>\n");
        for (key, value) in &definition.environment {
            push_string(&mut out, "\t\t", key, value);
        }
        out.push_str("\t</dict>\n");
    }

    if let Some(path) = &definition.stdout_path {
        push_string(&mut out, indent, "StandardOutPath", path);
    }
    if let Some(path) = &definition.stderr_path {
        push_string(&mut out, indent, "StandardErrorPath", path);
    }

    out.push_str(FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_render_minimal_definition() {
        let definition = ServiceDefinition {
            label: "com.example.agent".to_string(),
            program_arguments: vec!["/usr/local/bin/agent".to_string(), "--serve".to_string()],
            run_at_load: true,
            ..Default::default()
        };

        let xml = render(&definition);
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("\t<key>Label</key>\n\t<string>com.example.agent</string>\n"));
        assert!(xml.contains(
            "\t<array>\n\t\t<string>/usr/local/bin/agent</string>\n\t\t<string>--serve</string>\n\t</array>\n"
        ));
        assert!(xml.contains("\t<key>RunAtLoad</key>\n\t<true/>\n"));
        assert!(xml.contains("\t<key>KeepAlive</key>\n\t<false/>\n"));
        assert!(!xml.contains("EnvironmentVariables"));
        assert!(!xml.contains("StandardOutPath"));
        assert!(xml.ends_with("</dict>\n</plist>\n"));
    }

    #[test]
    fn test_render_escapes_and_optional_keys() {
        let mut environment = BTreeMap::new();
        environment.insert("QUERY".to_string(), "a<b && c>d".to_string());

        let definition = ServiceDefinition {
            label: "com.example.agent".to_string(),
            program_arguments: vec!["/bin/sh".to_string(), "-c".to_string(), "echo \"hi\"".to_string()],
            environment,
            working_directory: Some("/var/lib/agent".to_string()),
            stdout_path: Some("/tmp/agent.out".to_string()),
            stderr_path: Some("/tmp/agent.err".to_string()),
            ..Default::default()
        };

        let xml = render(&definition);
        assert!(xml.contains("<string>echo &quot;hi&quot;</string>"));
        assert!(xml.contains(
            "\t<dict>\n\t\t<key>QUERY</key>\n\t\t<string>a&lt;b &amp;&amp; c&gt;d</string>\n\t</dict>\n"
        ));
        assert!(xml.contains("<key>WorkingDirectory</key>\n\t<string>/var/lib/agent</string>"));
        assert!(xml.contains("<key>StandardOutPath</key>\n\t<string>/tmp/agent.out</string>"));
        assert!(xml.contains("<key>StandardErrorPath</key>\n\t<string>/tmp/agent.err</string>"));
    }
}
