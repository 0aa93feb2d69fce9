use xmlentity::{Document, XmlResult};

const CMP: &str = include_str!("nordic.xml");

fn nordic() -> XmlResult<Document> {
    Document::build("ReinosNórdicos", |root| {
        root.child("Midgard", |m| {
            m.attribute("Região", "Lago Dos Nove")
                .attribute("Povo", "Humanos e mortais");
        })
        .child("Alfheim", |a| {
            a.attribute("Região", "Lago da Luz")
                .attribute("Povo", "Elfos")
                .attribute("Curiosidade", "Brok não pode entrar devido a roubo & mau paleio");
        })
        .child("Asgard", |a| {
            a.attribute("Povo", "Deuses Aesir").child("Odin", |o| {
                o.attribute("Deus", "Aesir")
                    .attribute("Característica1", "Cruel")
                    .text("Pai de <Thor>");
            });
        })
        .child("Vanaheim", |v| {
            v.attribute("Povo", "Deuses Vanir")
                .attribute("Curiosidade", r#"Freya diz "olá""#);
        })
        .child("Jötunheim", |j| {
            j.attribute("Povo", "Jötnar");
        });
    })
}

#[test]
fn test_good() {
    let document = match nordic() {
        Ok(doc) => doc,
        Err(e) => panic!("{e}"),
    };

    let str = document.to_xml(None);
    let expected = CMP.trim_end_matches('\n');
    if str != expected {
        let mut src_lines = str.lines();
        for (i, line) in expected.lines().enumerate() {
            match src_lines.next() {
                None => {
                    panic!(
                        "Diff at line {}: Not enough rows in rendered document!",
                        i + 1
                    );
                }

                Some(l) => {
                    if line == l {
                        continue;
                    } else {
                        eprintln!("Diff at line {}", i + 1);

                        eprintln!("Expected: {line}");
                        eprintln!("Got: {l}");
                        break;
                    }
                }
            }
        }

        panic!("Rendered document does not match expected output");
    }
}

#[test]
fn test_tree_outline() {
    let document = nordic().unwrap();
    assert_eq!(
        document.to_tree(),
        "ReinosNórdicos\n\
         ├── Midgard\n\
         ├── Alfheim\n\
         ├── Asgard\n\
         │   └── Odin\n\
         ├── Vanaheim\n\
         └── Jötunheim"
    );
}

#[test]
fn test_attribute_lookups() {
    let document = nordic().unwrap();

    let midgard = document.entities(|e| e.name() == "Midgard");
    assert_eq!(midgard, document.entities_named("Midgard"));

    let curiosities: Vec<_> = document
        .entities(|_| true)
        .into_iter()
        .filter_map(|id| document.get(id))
        .map(|e| e.get_attributes(|key, _| key == "Curiosidade"))
        .filter(|found| !found.is_empty())
        .collect();
    assert_eq!(curiosities.len(), 2);
    assert_eq!(
        curiosities[1].get("Curiosidade").map(String::as_str),
        Some("Freya diz &quot;olá&quot;")
    );
}

#[test]
fn test_export_round_trip_to_file() {
    let document = nordic().unwrap();
    let path = std::env::temp_dir().join(format!("xmlentity-nordic-{}.xml", std::process::id()));

    document.write_to_file(&path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, CMP.trim_end_matches('\n'));
}
