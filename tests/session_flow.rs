use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use vocab_trainer::*;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()
}

fn collection() -> Vec<VocabularyCard> {
    (0..10)
        .map(|i| {
            let card = VocabularyCard::new(format!("term{i}"), format!("def{i}")).with_id(format!("v{i}"));
            if i % 3 == 0 {
                card
            } else {
                card.with_schedule(ScheduleState {
                    repetitions: 3,
                    interval: 10,
                    next_review: Some(now() + Duration::days(i)),
                    ..ScheduleState::default()
                })
            }
        })
        .collect()
}

fn ids(cards: &[QuizCard]) -> Vec<String> {
    cards.iter().map(|c| c.card.id.clone()).collect()
}

#[test]
fn new_mode_returns_only_unreviewed_entries() {
    // v0, v3, v6, v9 have never been reviewed; drop one so three remain
    let mut items = collection();
    items.retain(|c| c.id != "v9");
    let settings = QuizSettings {
        direction: DirectionSetting::Forward,
        words_per_quiz: 10,
    };

    let session = build_session(&items, SessionMode::New, &settings, now(), &mut StdRng::seed_from_u64(0));
    assert_eq!(ids(&session), vec!["v0", "v3", "v6"]);
}

#[test]
fn missed_entries_are_retried_regardless_of_due_state() {
    let mut db = Database::in_memory().unwrap();
    db.save_all(&collection()).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let settings = QuizSettings {
        direction: DirectionSetting::Random,
        words_per_quiz: 4,
    };

    let items = db.load_all().unwrap();
    let queue = build_session(&items, SessionMode::Review, &settings, now(), &mut rng);
    assert_eq!(queue.len(), 4);
    let mut session = LearningSession::new(queue);

    for quality in [1, 4, 0, 5] {
        session.reveal_answer().unwrap();
        session.rate(quality, now(), &mut db).unwrap();
    }
    assert!(session.is_completed());
    assert_eq!(session.accuracy(), 0.5);

    let missed: Vec<_> = session.missed_cards().into_iter().map(|c| c.id).collect();
    assert_eq!(missed.len(), 2);

    // the failed entries are now scheduled for tomorrow, so not due at all
    let stored = db.load_all().unwrap();
    for id in &missed {
        let card = stored.iter().find(|c| &c.id == id).unwrap();
        assert!(!is_due(&card.sm2, now()));
        assert_eq!(card.sm2.quality.map(|q| q < 3), Some(true));
    }

    let mut retry = session.retry_missed(settings.direction, &mut rng).unwrap();
    let mut retried = Vec::new();
    while let Some(card) = retry.current_card() {
        retried.push(card.card.id.clone());
        retry.reveal_answer().unwrap();
        retry.rate(3, now(), &mut db).unwrap();
    }
    assert_eq!(retried, missed);
    assert!(retry.missed_cards().is_empty());
}

#[test]
fn empty_due_session_means_nothing_to_study() {
    let items: Vec<_> = collection()
        .into_iter()
        .filter(|c| c.sm2.repetitions > 0)
        .collect();
    let session = build_session(
        &items,
        SessionMode::Due,
        &QuizSettings::default(),
        now() - Duration::days(30),
        &mut StdRng::seed_from_u64(0),
    );

    assert!(session.is_empty());
    assert!(LearningSession::new(session).is_completed());
}
