use std::fs;

fn main() -> anyhow::Result<()> {
    // Build the document the same way the server does and write it out for client codegen.
    let doc = taskboard_rbac::docs::build_openapi(8000)?;
    let s = serde_json::to_string_pretty(&doc)?;
    let path = std::env::args().nth(1).unwrap_or_else(|| "/tmp/taskboard-rbac-openapi.json".to_string());
    fs::write(&path, s)?;
    println!("wrote {}", path);
    Ok(())
}
