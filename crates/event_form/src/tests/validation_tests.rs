use super::*;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use shared::domain::EventType;

fn valid_draft() -> DraftEvent {
    DraftEvent {
        name: "Tech Meetup".into(),
        location: "Kinshasa".into(),
        date: "12/05/2025".into(),
        start_time: "10:00".into(),
        end_time: "12:00".into(),
        description: "Annual tech gathering".into(),
        price: "0".into(),
        event_type: Some(EventType::Conference),
        link: String::new(),
        image_uri: "img://abc".into(),
    }
}

#[test]
fn default_draft_is_not_submittable() {
    let draft = DraftEvent::default();
    assert!(!compute_submittable(&draft));
    assert_eq!(failing_fields(&draft).len(), DraftField::ALL.len() - 1);
    assert!(!failing_fields(&draft).contains(&DraftField::Link));
}

#[test]
fn fully_filled_draft_is_submittable() {
    let draft = valid_draft();
    assert!(compute_submittable(&draft));
    assert!(failing_fields(&draft).is_empty());
}

#[test]
fn name_and_location_need_three_characters() {
    let mut draft = valid_draft();
    draft.name = "ab".into();
    assert!(!compute_submittable(&draft));
    draft.name = "abc".into();
    assert!(compute_submittable(&draft));

    draft.location = "Ki".into();
    assert_eq!(failing_fields(&draft), vec![DraftField::Location]);
    draft.location = "Kin".into();
    assert!(compute_submittable(&draft));
}

#[test]
fn description_needs_ten_characters() {
    let mut draft = valid_draft();
    draft.description = "123456789".into();
    assert!(!compute_submittable(&draft));
    draft.description = "1234567890".into();
    assert!(compute_submittable(&draft));
}

#[test]
fn lengths_count_characters_not_bytes() {
    let mut draft = valid_draft();
    draft.name = "éé".into();
    assert!(!compute_submittable(&draft));
    draft.name = "ééé".into();
    assert!(compute_submittable(&draft));
}

#[test]
fn whitespace_only_text_counts_as_empty() {
    let mut draft = valid_draft();
    draft.name = "     ".into();
    assert_eq!(failing_fields(&draft), vec![DraftField::Name]);

    let mut draft = valid_draft();
    draft.price = " ".into();
    assert_eq!(failing_fields(&draft), vec![DraftField::Price]);
}

#[test]
fn time_placeholder_is_not_a_chosen_time() {
    let mut draft = valid_draft();
    draft.start_time = TIME_PLACEHOLDER.into();
    assert_eq!(failing_fields(&draft), vec![DraftField::StartTime]);

    let mut draft = valid_draft();
    draft.end_time = TIME_PLACEHOLDER.into();
    assert_eq!(failing_fields(&draft), vec![DraftField::EndTime]);
}

#[test]
fn unset_type_blocks_submission() {
    let mut draft = valid_draft();
    draft.event_type = None;
    assert_eq!(failing_fields(&draft), vec![DraftField::Type]);
}

#[test]
fn link_is_optional_but_must_be_a_url_when_present() {
    let mut draft = valid_draft();
    draft.link = String::new();
    assert!(compute_submittable(&draft));
    draft.link = "not a url".into();
    assert!(!compute_submittable(&draft));
    draft.link = "https://example.com".into();
    assert!(compute_submittable(&draft));
}

#[test]
fn url_grammar_requires_scheme_and_host() {
    assert!(is_valid_url("https://example.com"));
    assert!(is_valid_url("http://eventcademy.dev/events/42?ref=app"));
    assert!(!is_valid_url("not-a-url"));
    assert!(!is_valid_url("example.com"));
    assert!(!is_valid_url("https://"));
    assert!(!is_valid_url("mailto:team@example.com"));
    assert!(!is_valid_url(" https://example.com"));
    assert!(!is_valid_url(""));
}

const NAMES: &[&str] = &["", "  ", "ab", "abc", " ab", "éé", "ééé", "Tech Meetup"];
const DATES: &[&str] = &["", "   ", "12/05/2025"];
const TIMES: &[&str] = &["", " ", TIME_PLACEHOLDER, "10:00", "23:59"];
const DESCRIPTIONS: &[&str] = &[
    "",
    "123456789",
    "1234567890",
    "          ",
    "         x",
    "Annual tech gathering",
];
const PRICES: &[&str] = &["", " ", "0", "15.5"];
const LINKS: &[(&str, bool)] = &[
    ("", true),
    ("https://example.com", true),
    ("http://eventcademy.dev/events/42?ref=app", true),
    ("ftp://files.example.org/agenda.pdf", true),
    ("not a url", false),
    ("not-a-url", false),
    ("example.com", false),
    ("mailto:team@example.com", false),
    ("https://", false),
    (" https://example.com", false),
];
const IMAGES: &[&str] = &["", " ", "img://abc", "content://media/picker/0/1"];

fn pick(pool: &[&'static str], rng: &mut StdRng) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn reference_submittable(draft: &DraftEvent, link_ok: bool) -> bool {
    let filled = |value: &str| value.chars().any(|c| !c.is_whitespace());
    let at_least = |value: &str, n: usize| filled(value) && value.chars().count() >= n;
    let chosen = |value: &str| filled(value) && value != "__:__";

    at_least(&draft.name, 3)
        && at_least(&draft.location, 3)
        && filled(&draft.date)
        && chosen(&draft.start_time)
        && chosen(&draft.end_time)
        && at_least(&draft.description, 10)
        && filled(&draft.price)
        && draft.event_type.is_some()
        && link_ok
        && filled(&draft.image_uri)
}

#[test]
fn submittable_matches_reference_conjunction_for_random_drafts() {
    let mut rng = StdRng::seed_from_u64(0x0e7e_17ca);
    let mut types: Vec<Option<EventType>> = EventType::ALL.into_iter().map(Some).collect();
    types.push(None);

    let mut seen_submittable = 0;
    for _ in 0..20_000 {
        let (link, link_ok) = *LINKS.choose(&mut rng).expect("links");
        let draft = DraftEvent {
            name: pick(NAMES, &mut rng).into(),
            location: pick(NAMES, &mut rng).into(),
            date: pick(DATES, &mut rng).into(),
            start_time: pick(TIMES, &mut rng).into(),
            end_time: pick(TIMES, &mut rng).into(),
            description: pick(DESCRIPTIONS, &mut rng).into(),
            price: pick(PRICES, &mut rng).into(),
            event_type: *types.choose(&mut rng).expect("types"),
            link: link.into(),
            image_uri: pick(IMAGES, &mut rng).into(),
        };

        let expected = reference_submittable(&draft, link_ok);
        assert_eq!(compute_submittable(&draft), expected, "draft: {draft:?}");
        assert_eq!(failing_fields(&draft).is_empty(), expected, "draft: {draft:?}");
        if expected {
            seen_submittable += 1;
        }
    }

    assert!(seen_submittable > 0, "generator never produced a valid draft");
}
