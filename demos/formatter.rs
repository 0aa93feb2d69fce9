//! Tree Formatter Example
//!
//! This example prints a document as an outline, runs a path query, and removes part of the tree.
//!
//! It also shows that a custom visitor can walk the same tree.
use xmlentity::{Document, EntityRef, Visitor, XmlResult};

/// Counts the attributes of every entity it visits.
#[derive(Default)]
struct AttributeCounter(usize);
impl Visitor for AttributeCounter {
    fn enter(&mut self, entity: EntityRef<'_>) {
        self.0 += entity.attributes().len();
    }
}

fn main() -> XmlResult<()> {
    let mut document = Document::build("ReinosNórdicos", |root| {
        root.child("Asgard", |a| {
            a.attribute("Povo", "Deuses Aesir")
                .child("Odin", |o| {
                    o.attribute("Deus", "Aesir").text("Pai de <Thor>");
                })
                .leaf("Thor");
        })
        .child("Midgard", |m| {
            m.attribute("Povo", "Humanos e mortais");
        })
        .leaf("Jötunheim");
    })?;

    println!("{}\n", document.to_tree());

    //
    // Paths are matched by child name, starting below the root
    for found in document.query("Asgard/Odin") {
        println!("Found: {found}");
    }

    let mut counter = AttributeCounter::default();
    document.tree().accept(&mut counter);
    println!("Attributes: {}\n", counter.0);

    //
    // Removal happens after the walk, so a removed subtree goes in one piece
    let removed = document.remove_entities(|name| name.starts_with("Asgard"))?;
    println!("Removed {removed} entities:\n{}", document.to_tree());

    Ok(())
}
