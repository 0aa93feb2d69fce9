//! Reflection Example
//!
//! This example turns plain Rust values into an entity tree by implementing `ToEntity`.
use std::borrow::Cow;
use xmlentity::{Document, Field, ToEntity, XmlResult};

struct Componente {
    nome: String,
    peso: u8,
}
impl ToEntity for Componente {
    fn entity_name(&self) -> Cow<'static, str> {
        "componente".into()
    }

    fn fields(&self) -> Vec<(&'static str, Field<'_>)> {
        vec![
            ("nome", Field::attribute(&self.nome)),
            ("peso", Field::attribute(format!("{}%", self.peso))),
        ]
    }
}

struct Fuc {
    codigo: String,
    notas_internas: String,
    componentes: Vec<Componente>,
}
impl ToEntity for Fuc {
    fn entity_name(&self) -> Cow<'static, str> {
        "fuc".into()
    }

    fn fields(&self) -> Vec<(&'static str, Field<'_>)> {
        let _ = &self.notas_internas;
        vec![
            ("codigo", Field::attribute(&self.codigo)),
            ("notas_internas", Field::Ignore),
            ("componentes", Field::entities(&self.componentes)),
        ]
    }
}

fn main() -> XmlResult<()> {
    let fuc = Fuc {
        codigo: "M4310".to_string(),
        notas_internas: "not exported".to_string(),
        componentes: vec![
            Componente {
                nome: "Quizzes".to_string(),
                peso: 20,
            },
            Componente {
                nome: "Projeto".to_string(),
                peso: 80,
            },
        ],
    };

    let document = Document::new(fuc.to_entity()?);
    println!("{}\n", document.to_tree());
    println!("{}", document.to_xml(None));

    Ok(())
}
