// main.rs
//
// Builds every gallery structure and writes it to stl/<name>.stl.

use std::fs;

fn main() {
    // Ensure the /stl folder exists
    let _ = fs::create_dir_all("stl");

    let entries = match cagegen::gallery::all() {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("gallery failed: {err}");
            std::process::exit(1);
        },
    };

    for (name, mesh) in entries {
        let path = format!("stl/{name}.stl");
        match mesh
            .to_stl_binary()
            .and_then(|bytes| fs::write(&path, bytes))
        {
            Ok(()) => {
                println!(
                    "{path}: {} vertices, {} faces",
                    mesh.vertex_count(),
                    mesh.face_count()
                );
            },
            Err(err) => eprintln!("{path}: {err}"),
        }
    }
}
