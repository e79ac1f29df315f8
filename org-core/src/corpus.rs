//! # Corpus de Demonstração em Russo e Inglês
//!
//! Documentos curtos cobrindo os casos que o motor precisa resolver: órgão de
//! Estado com geografia, subdivisão com superior implícito, correferência de
//! organização global, apelido declarado, subdivisão após empresa, tipo no
//! plural e nomes latinos.
//!
//! O analisador morfológico e o resolvedor geográfico reais são externos; aqui
//! há tabelas que cobrem apenas o vocabulário dos documentos.

use crate::morph::{Case, DictionaryMorphology, Morph, Number, PartOfSpeech};
use crate::referent::{GazetteerResolver, GeoRef, PersonRef};

/// Um documento de demonstração.
pub struct DemoText {
    pub title: &'static str,
    pub text: &'static str,
    /// Nomes (ou siglas) que devem aparecer entre as entidades reconhecidas.
    pub expected: &'static [&'static str],
}

/// Retorna os documentos de demonstração.
pub fn demo_texts() -> Vec<DemoText> {
    vec![
        DemoText {
            title: "Ministério com geografia",
            text: "Министерство юстиции Российской Федерации утвердило новые правила регистрации.",
            expected: &["юстиции"],
        },
        DemoText {
            title: "Subdivisão com superior implícito",
            text: "ГУВД по Московской области сообщило о задержании.",
            expected: &["МВД"],
        },
        DemoText {
            title: "Correferência",
            text: "Газпром России увеличил добычу газа. Позднее Газпром объявил о новых контрактах.",
            expected: &["Газпром"],
        },
        DemoText {
            title: "Apelido",
            text: "Комитет по делам молодежи (далее — Комитет) утвердил программу. Комитет также провел конкурс.",
            expected: &["по делам молодежи"],
        },
        DemoText {
            title: "Subdivisão após empresa",
            text: "В ООО «Ромашка» отдел кадров объявил набор сотрудников.",
            expected: &["Ромашка", "кадров"],
        },
        DemoText {
            title: "Tipo no plural",
            text: "Министерства юстиции и финансов подписали соглашение.",
            expected: &["юстиции", "финансов"],
        },
        DemoText {
            title: "Nomes latinos",
            text: "Shares of Acme Bank rose after Microsoft announced a deal with Orbit Systems Ltd.",
            expected: &["Acme", "Microsoft", "Orbit Systems"],
        },
    ]
}

/// Morfologia das palavras dos documentos de demonstração.
pub fn demo_morphology() -> DictionaryMorphology {
    use Case::*;

    let mut dict = DictionaryMorphology::with_function_words();

    for verb in [
        "утвердило", "утвердил", "сообщило", "увеличил", "объявил", "провел", "подписали", "rose", "announced",
    ] {
        dict.insert(verb, Morph::new(PartOfSpeech::Verb));
    }
    for adverb in ["позднее", "также"] {
        dict.insert(adverb, Morph::new(PartOfSpeech::Adverb));
    }

    dict.insert("министерства", Morph::noun(&[Nominative], Number::Plural).with_lemma("министерство"));
    dict.insert("юстиции", Morph::noun(&[Genitive], Number::Singular));
    dict.insert("финансов", Morph::noun(&[Genitive], Number::Plural));
    dict.insert("кадров", Morph::noun(&[Genitive], Number::Plural));
    dict.insert("делам", Morph::noun(&[Dative], Number::Plural));
    dict.insert("молодежи", Morph::noun(&[Genitive], Number::Singular));
    dict.insert("газа", Morph::noun(&[Genitive], Number::Singular));
    dict.insert("сотрудников", Morph::noun(&[Genitive], Number::Plural));
    dict.insert("регистрации", Morph::noun(&[Genitive], Number::Singular));
    dict.insert("задержании", Morph::noun(&[Prepositional], Number::Singular));
    dict.insert("контрактах", Morph::noun(&[Prepositional], Number::Plural));
    dict.insert("добычу", Morph::noun(&[Accusative], Number::Singular));
    dict.insert("программу", Morph::noun(&[Accusative], Number::Singular));
    dict.insert("правила", Morph::noun(&[Nominative, Accusative], Number::Plural));
    dict.insert("набор", Morph::noun(&[Nominative, Accusative], Number::Singular));
    dict.insert("конкурс", Morph::noun(&[Nominative, Accusative], Number::Singular));
    dict.insert("соглашение", Morph::noun(&[Nominative, Accusative], Number::Singular));
    dict.insert("новые", Morph::adjective(&[Nominative, Accusative], Number::Plural));
    dict.insert("новых", Morph::adjective(&[Genitive, Prepositional], Number::Plural));
    dict
}

/// Geografia e pessoas citadas nos documentos de demonstração.
pub fn demo_resolver() -> GazetteerResolver {
    let russia = GeoRef::state("Россия");
    let mut resolver = GazetteerResolver::new();
    resolver
        .add_geo(&["Россия", "России", "Российской Федерации", "Российская Федерация", "РФ"], russia)
        .add_geo(
            &["Московской области", "Московская область", "Подмосковья"],
            GeoRef::region("Московская область", "Россия"),
        )
        .add_geo(&["Москва", "Москвы", "Москве"], GeoRef::city("Москва", "Россия"))
        .add_geo(&["Казань", "Казани"], GeoRef::city("Казань", "Россия"))
        .add_geo(&["London"], GeoRef::city("London", "United Kingdom"))
        .add_person(&["Ломоносова", "Ломоносов"], PersonRef::new("Ломоносов"))
        .add_person(&["Пушкина", "Пушкин"], PersonRef::new("Пушкин"));
    resolver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::morph::MorphAnalyzer;
    use crate::referent::{resolve_at, ReferentKind};
    use crate::tokenizer::tokenize;

    #[test]
    fn test_every_demo_has_expectations() {
        let texts = demo_texts();
        assert_eq!(texts.len(), 7);
        assert!(texts.iter().all(|t| !t.text.is_empty() && !t.expected.is_empty()));
    }

    #[test]
    fn test_demo_morphology() {
        let dict = demo_morphology();
        assert_eq!(dict.analyze("Утвердило").pos, PartOfSpeech::Verb);
        let m = dict.analyze("министерства");
        assert_eq!(m.number, Number::Plural);
        assert_eq!(m.lemma.as_deref(), Some("МИНИСТЕРСТВО"));
        assert!(dict.analyze("по").pos == PartOfSpeech::Preposition);
    }

    #[test]
    fn test_demo_resolver() {
        let resolver = demo_resolver();
        let s = tokenize("ГУВД по Московской области", &demo_morphology());
        let m = resolve_at(&resolver, ReferentKind::Geo, &s, 2).unwrap();
        assert_eq!(m.end, 3);
        assert_eq!(m.referent.as_geo().unwrap().parent.as_deref(), Some("РОССИЯ"));
    }
}
