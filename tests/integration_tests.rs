//! Integration tests for the bandish notation engine
//!
//! Tests the full pipeline from a classified composition to kern output.

use std::collections::BTreeMap;

use bandish::{
    flatten_by_section, pad_subgroup, transcribe, transcribe_to_kern, BandishError, Composition,
    Meend, PartKind, PitchTable, Section, SectionInput, SectionMarkers, SectionRange,
    SlotSequences, TaalRegistry, Transcriber,
};

const YAMAN: &str = r#"
raag: Yaman
taal: Teental
lay: Madhya
source:
  name: Kramik Pustak Malika
  page: 42
sections:
  sthayee:
    sam-beat: 1
    meend: ["", "", "", "", "S", "E", "", "", "", "", "", "", "", "", "", ""]
    kann-swar: [[], ["saa"], [], [], [], [], [], [], [], [], [], [], [], [], [], []]
    swar:
      - ["ni,"]
      - ["re", "ga"]
      - ["(ga)"]
      - ["-"]
      - ["pa"]
      - ["dha"]
      - ["ni"]
      - ["saa'"]
      - ["pa"]
      - ["ma"]
      - ["ga"]
      - ["re"]
      - ["saa"]
      - ["-"]
      - ["-"]
      - ["-"]
  antara:
    sam-beat: 9
    swar:
      - ["pa_"]
      - ["pa"]
      - ["saa'"]
      - ["saa'"]
      - ["saa'"]
      - ["-"]
      - ["ni"]
      - ["saa'"]
      - []
      - []
"#;

const YAMAN_HEADER: &str = "!!!raag: Yaman\n!!!taal: Teental\n!!!lay: Madhya\n\
!!!source: Kramik Pustak Malika\n!!!page: 42\n**kern\n*M16/4\n*MM90\n*clefG2\n*c:";

const YAMAN_STHAYEE: &str = "==1\n4B\ncq\n8d\n8e\n16f\n16e\n16d\n16e\n4e\n=\n(4g\n4a)\n4b\n4cc\n=\n\
4g\n4f\n4e\n4d\n=\n4c\n4c\n4c\n4c\n=";

const YAMAN_TRANSITION: &str = "4B\ncq\n8d\n8e\n16f\n16e\n16d\n16e\n4e\n=\n(4g\n4a)\n4b\n4cc\n=";

const YAMAN_ANTARA: &str = "==1\n4g\n4g\n4cc\n4cc\n=\n4cc\n4cc\n4b\n4cc\n=";

#[test]
fn test_transcribe_full_document() {
    let kern = transcribe_to_kern(YAMAN).unwrap();
    let expected = format!(
        "{}\n\n!! Sthayee\n{}\n\n!! Sthayee to Antara Transition\n{}\n\n!! Antara\n{}\n\n",
        YAMAN_HEADER, YAMAN_STHAYEE, YAMAN_TRANSITION, YAMAN_ANTARA
    );
    assert_eq!(kern, expected);
}

#[test]
fn test_transcription_parts() {
    let transcription = transcribe(YAMAN).unwrap();
    assert!(transcription.is_complete());
    assert_eq!(transcription.header.text, YAMAN_HEADER);

    let sthayee = transcription
        .part(PartKind::Section(Section::Sthayee))
        .expect("sthayee should be written");
    assert_eq!(sthayee.heading, "!! Sthayee");
    assert_eq!(sthayee.encoded.text, YAMAN_STHAYEE);

    let transition = transcription
        .part(PartKind::Transition {
            from: Section::Sthayee,
            to: Section::Antara,
        })
        .expect("transition should be written");
    // Two divisions from khali back round to the antara's first division
    let barlines = transition
        .encoded
        .tokens
        .iter()
        .filter(|token| token.is_barline())
        .count();
    assert_eq!(barlines, 2);
}

#[test]
fn test_section_failure_keeps_rest_of_document() {
    let source = r#"
raag: Bhairav
taal: Jhaptaal
lay: vilambit
sections:
  sthayee:
    sam-beat: 1
    swar: [["saa"], ["rek"], ["tha"]]
  antara:
    sam-beat: 4
    swar: [["pa"], ["dhak"], ["pa"], []]
"#;
    let transcription = transcribe(source).unwrap();
    assert_eq!(transcription.failures.len(), 1);
    assert_eq!(
        transcription.failures[0].error,
        BandishError::UnknownSymbol {
            symbol: "tha".to_string(),
            slot: 2,
        }
    );

    let kern = transcription.to_kern();
    assert!(kern.contains("*M10/4"));
    assert!(kern.contains("*MM60"));
    assert!(!kern.contains("!! Sthayee"));
    assert!(kern.contains("!! Antara\n==1\n4g\n4a-\n4g"));

    assert_eq!(
        transcribe_to_kern(source),
        Err(BandishError::UnknownSymbol {
            symbol: "tha".to_string(),
            slot: 2,
        })
    );
}

#[test]
fn test_invalid_sam_beat_reported() {
    let source = r#"
raag: Yaman
taal: Teental
lay: drut
sections:
  sthayee:
    sam-beat: 6
    swar: [["saa"]]
"#;
    let result = transcribe_to_kern(source);
    assert_eq!(
        result,
        Err(BandishError::InvalidSamBeat {
            taal: "Teental".to_string(),
            sam_beat: 6,
            valid: vec![1, 5, 9, 13],
        })
    );
}

#[test]
fn test_unknown_taal_stops_transcription() {
    let source = r#"
raag: Yaman
taal: Brahmtaal
sections:
  sthayee:
    sam-beat: 1
    swar: [["saa"]]
"#;
    assert_eq!(
        transcribe(source).map(|_| ()),
        Err(BandishError::UnknownTaal("Brahmtaal".to_string()))
    );
}

#[test]
fn test_custom_taal_and_pitches() {
    let mut registry = TaalRegistry::builtin();
    registry.merge(
        TaalRegistry::from_yaml(
            r#"
Pashto:
  beat-count: 7
  divisions: [3, 2, 2]
  vibhaag: ["X", "0", "3"]
  time-signature: 7/8
"#,
        )
        .unwrap(),
    );
    let mut pitches = PitchTable::standard();
    pitches.merge(PitchTable::from_yaml("sa: c\n").unwrap());

    let composition = Composition {
        raag: "Pilu".to_string(),
        taal: "Pashto".to_string(),
        lay: "Madhya".to_string(),
        source: None,
        sections: [(
            Section::Sthayee,
            SectionInput {
                sam_beat: 1,
                slots: SlotSequences {
                    meend: vec![Meend::None; 4],
                    kann_swar: vec![Vec::new(); 4],
                    swar: vec![
                        vec!["sa".to_string()],
                        vec!["gak".to_string()],
                        vec!["ma".to_string()],
                        vec!["pa".to_string()],
                    ],
                },
            },
        )]
        .into_iter()
        .collect(),
    };

    let transcription = Transcriber::new(registry, pitches)
        .transcribe(&composition)
        .unwrap();
    let kern = transcription.to_kern();
    assert!(kern.contains("*M7/8"));
    assert!(kern.contains("!! Sthayee\n==1\n4c\n4e-\n4f\n=\n4g"));
}

#[test]
fn test_page_layout_to_kern() {
    // One subgroup above the sthayee marker (title rows), a pickup line
    // and a full line of sthayee, then a line of antara.
    let subgroup = |swar: &[&str]| SlotSequences {
        meend: vec![Meend::None; swar.len()],
        kann_swar: vec![Vec::new(); swar.len()],
        swar: swar.iter().map(|s| vec![s.to_string()]).collect(),
    };

    let beat_count = 8;
    let mut subgroups = BTreeMap::new();
    subgroups.insert(SectionRange::new(0, 1), subgroup(&["saa"]));
    subgroups.insert(
        SectionRange::new(3, 5),
        pad_subgroup(subgroup(&["ga", "re", "saa", "ni,"]), true, beat_count),
    );
    subgroups.insert(
        SectionRange::new(5, 7),
        pad_subgroup(subgroup(&["saa", "re", "ga"]), false, beat_count),
    );
    subgroups.insert(
        SectionRange::new(9, 11),
        pad_subgroup(subgroup(&["pa", "pa"]), false, beat_count),
    );

    let markers: SectionMarkers = [(Section::Sthayee, 2), (Section::Antara, 8)]
        .into_iter()
        .collect();
    let flattened = flatten_by_section(subgroups, &markers);
    assert_eq!(flattened[&Section::Sthayee].slot_count().unwrap(), 16);

    let composition = Composition {
        raag: "Bhupali".to_string(),
        taal: "Keherwa".to_string(),
        lay: "drut".to_string(),
        source: None,
        sections: flattened
            .into_iter()
            .map(|(section, slots)| (section, SectionInput { sam_beat: 1, slots }))
            .collect(),
    };

    let transcription = Transcriber::default().transcribe(&composition).unwrap();
    let sthayee = transcription
        .part(PartKind::Section(Section::Sthayee))
        .unwrap();
    assert_eq!(
        sthayee.encoded.text,
        "==1\n4ryy\n4ryy\n4ryy\n4ryy\n=\n4e\n4d\n4c\n4B\n==2\n4c\n4d\n4e"
    );
    let antara = transcription
        .part(PartKind::Section(Section::Antara))
        .unwrap();
    assert_eq!(antara.encoded.text, "==1\n4g\n4g");
}
