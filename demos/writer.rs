//! XML Writer Example
//!
//! This example builds a small study plan, changes it with the bulk operators, and writes it out.
//!
//! It demonstrates how to use the `xmlentity` crate to create XML documents programmatically.
use xmlentity::{Document, XmlResult};

fn main() -> XmlResult<()> {
    //
    // Documents are built from a root name and a closure describing the root.
    // Any invalid name or duplicate attribute is reported once the closure returns.
    let mut document = Document::build("plano", |plano| {
        plano
            .child("fuc", |fuc| {
                fuc.attribute("codigo", "M4310").attribute("nome", "Programação");
            })
            .child("fuc", |fuc| {
                fuc.attribute("codigo", "03782").attribute("nome", "Dissertação");
            });
    })?;

    //
    // Bulk operators select entities by their full opening tag text.
    document.add_entities(|name| name.starts_with("fuc"), "avaliacao")?;
    document.add_attributes(|name| name == "avaliacao", "epoca", "normal")?;
    document.edit_attributes(|name| name.contains("M4310"), "nome", "Programação & Algoritmos")?;

    //
    // Special characters in values were escaped when they were stored.
    // The `to_xml` method takes an optional string to use as indentation; if `None`, a tab is used.
    println!("{}", document.to_xml(Some("  ")));

    //
    // Writing to a file replaces the target in one step.
    let path = std::env::temp_dir().join("plano.xml");
    document.write_to_file(&path)?;
    println!("\nWritten to {}", path.display());

    Ok(())
}
