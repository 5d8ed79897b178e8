use std::fs;
use std::path::Path;

const PLACEHOLDER: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>Mi Comida Favorita</title>
</head>
<body>
    <p>Frontend not built. Run <code>trunk build --release</code> in <code>frontend/</code>.</p>
</body>
</html>
"#;

fn main() {
    // rust-embed needs the folder to exist before the frontend is built
    let dist = Path::new("../frontend/dist");
    let index = dist.join("index.html");

    println!("cargo:rerun-if-changed=../frontend/dist/index.html");

    if !index.exists() {
        fs::create_dir_all(dist).expect("Failed to create frontend dist directory");
        fs::write(&index, PLACEHOLDER).expect("Failed to write placeholder index.html");
        println!("cargo:warning=frontend/dist not found, wrote placeholder index.html");
    }
}
