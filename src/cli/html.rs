use std::path::PathBuf;

use crate::cli::open_session;
use crate::error::{CadenceError, Result};
use crate::render::html::{inject_into_template, page, render_all, HtmlPort};
use crate::settings::{load_settings, shellexpand_path};

pub fn run(
    file: Option<String>,
    output: Option<String>,
    template: Option<String>,
    target: Option<String>,
) -> Result<()> {
    let mut port = HtmlPort::default();
    let mut session = open_session(file, &mut port)?;
    render_all(&mut session, &mut port)?;
    let fragment = port.fragment();

    let html = match template {
        Some(template) => {
            let path = shellexpand_path(&template);
            let content = std::fs::read_to_string(&path)
                .map_err(|e| CadenceError::Other(format!("Cannot read template {path}: {e}")))?;
            let target = target.unwrap_or_else(|| load_settings().html_target);
            inject_into_template(&content, &target, &fragment)?
        }
        None => page(&fragment),
    };

    let out_path = PathBuf::from(shellexpand_path(
        output.as_deref().unwrap_or("calendar.html"),
    ));
    std::fs::write(&out_path, html)?;
    println!(
        "Wrote {} years to {}",
        session.index().years().len(),
        out_path.display()
    );
    Ok(())
}
