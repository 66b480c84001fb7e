use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Probe source text and the name to show in diagnostics.
pub struct ProbeSource {
    pub name: Option<String>,
    pub text: String,
}

pub fn load_probe_source(
    probe_path: Option<&Path>,
    probe_text: Option<&str>,
) -> Result<ProbeSource, String> {
    if let Some(text) = probe_text {
        return Ok(ProbeSource {
            name: None,
            text: text.to_owned(),
        });
    }

    if let Some(path) = probe_path {
        if path.as_os_str() == "-" {
            return load_stdin();
        }
        return load_file(path);
    }

    Err("probe is required: use positional argument or -q/--probe".to_string())
}

fn load_stdin() -> Result<ProbeSource, String> {
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .map_err(|e| format!("failed to read stdin: {}", e))?;
    Ok(ProbeSource {
        name: Some("<stdin>".to_owned()),
        text: buf,
    })
}

fn load_file(path: &Path) -> Result<ProbeSource, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(ProbeSource {
        name: Some(path.to_string_lossy().into_owned()),
        text,
    })
}
