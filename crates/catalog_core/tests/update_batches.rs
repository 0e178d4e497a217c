use std::sync::Once;

use catalog_core::{
    update, AppState, Batch, CampaignTag, DisplayState, Effect, FetchOutcome, Generation, Msg,
    PriceBracket, Product, Provider, ProviderOutcome,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn loaded(codes: &[&str]) -> AppState {
    let providers = codes
        .iter()
        .map(|code| Provider {
            code: code.to_string(),
            name: code.to_uppercase(),
            image_url: format!("https://img.example.com/{code}.png"),
            campaign_tag: CampaignTag::Free,
        })
        .collect();
    let (state, _) = update(AppState::new(), Msg::ProvidersLoaded(providers));
    state
}

fn product(provider: &str, code: &str, rate: f64) -> Product {
    Product {
        product_code: code.to_string(),
        product_name: format!("{provider} {code}"),
        product_rate: rate,
        provider_code: provider.to_string(),
    }
}

fn toggle(state: AppState, code: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::ProviderToggled(code.to_string()))
}

fn issued(effects: &[Effect]) -> Batch {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchBatch(batch) => Some(batch.clone()),
            _ => None,
        })
        .expect("fetch batch effect")
}

fn complete(
    state: AppState,
    generation: Generation,
    outcomes: Vec<(&str, FetchOutcome)>,
) -> (AppState, Vec<Effect>) {
    let outcomes = outcomes
        .into_iter()
        .map(|(code, outcome)| ProviderOutcome::new(code, outcome))
        .collect();
    update(
        state,
        Msg::BatchCompleted {
            generation,
            outcomes,
        },
    )
}

#[test]
fn single_provider_without_catalog_is_empty_no_products() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let batch = issued(&effects);

    let (state, effects) = complete(state, batch.generation, vec![("a", FetchOutcome::NotFound)]);
    assert_eq!(state.display(), &DisplayState::EmptyNoProducts);
    assert!(effects.is_empty());
}

#[test]
fn low_bracket_keeps_only_cheap_products_across_providers() {
    init_logging();
    let (state, _) = update(loaded(&["a", "b"]), Msg::PriceBracketSelected(PriceBracket::Low));
    let (state, _) = toggle(state, "a");
    let (state, effects) = toggle(state, "b");
    let batch = issued(&effects);
    assert_eq!(batch.price_bracket, PriceBracket::Low);

    let (state, effects) = complete(
        state,
        batch.generation,
        vec![
            ("b", FetchOutcome::Success(vec![product("b", "b1", 1500.0)])),
            ("a", FetchOutcome::Success(vec![product("a", "a1", 500.0)])),
        ],
    );
    assert_eq!(
        state.display(),
        &DisplayState::Results(vec![product("a", "a1", 500.0)])
    );
    assert_eq!(effects, vec![Effect::ScrollToResults]);
}

#[test]
fn products_outside_bracket_are_empty_filtered() {
    init_logging();
    let (state, _) = update(loaded(&["a"]), Msg::PriceBracketSelected(PriceBracket::Low));
    let (state, effects) = toggle(state, "a");
    let batch = issued(&effects);

    let (state, effects) = complete(
        state,
        batch.generation,
        vec![("a", FetchOutcome::Success(vec![product("a", "a1", 1500.0)]))],
    );
    assert_eq!(state.display(), &DisplayState::EmptyFiltered);
    assert!(effects.is_empty());
}

#[test]
fn network_failure_becomes_error() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let batch = issued(&effects);

    let (state, _) = complete(
        state,
        batch.generation,
        vec![("a", FetchOutcome::Failure("connection refused".into()))],
    );
    assert_eq!(
        state.display(),
        &DisplayState::Error("connection refused".into())
    );
}

#[test]
fn deselect_before_response_ends_idle_and_drops_late_result() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let first = issued(&effects);

    let (state, effects) = toggle(state, "a");
    assert_eq!(effects, vec![Effect::CancelSuperseded { generation: 2 }]);
    assert_eq!(state.display(), &DisplayState::Idle);

    let (mut state, effects) = complete(
        state,
        first.generation,
        vec![("a", FetchOutcome::Success(vec![product("a", "a1", 300.0)]))],
    );
    assert_eq!(state.display(), &DisplayState::Idle);
    assert!(effects.is_empty());
    state.consume_dirty();

    // Still stale on a second delivery.
    let (mut state, _) = complete(state, first.generation, vec![("a", FetchOutcome::NotFound)]);
    assert!(!state.consume_dirty());
    assert_eq!(state.display(), &DisplayState::Idle);
}

#[test]
fn not_found_provider_does_not_hide_other_products() {
    init_logging();
    let (state, _) = toggle(loaded(&["a", "b"]), "a");
    let (state, effects) = toggle(state, "b");
    let batch = issued(&effects);

    let b_products = vec![product("b", "b1", 450.0), product("b", "b2", 1100.0)];
    let (state, _) = complete(
        state,
        batch.generation,
        vec![
            ("a", FetchOutcome::NotFound),
            ("b", FetchOutcome::Success(b_products.clone())),
        ],
    );
    assert_eq!(state.display(), &DisplayState::Results(b_products));
}

#[test]
fn failure_drops_successes_of_the_same_batch() {
    init_logging();
    let (state, _) = toggle(loaded(&["a", "b"]), "a");
    let (state, effects) = toggle(state, "b");
    let batch = issued(&effects);

    let (state, effects) = complete(
        state,
        batch.generation,
        vec![
            ("a", FetchOutcome::Success(vec![product("a", "a1", 100.0)])),
            ("b", FetchOutcome::Failure("timeout".into())),
        ],
    );
    assert_eq!(state.display(), &DisplayState::Error("timeout".into()));
    assert!(effects.is_empty());
}

#[test]
fn newest_generation_wins_regardless_of_arrival_order() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a", "b"]), "a");
    let first = issued(&effects);
    let (state, effects) = toggle(state, "b");
    let second = issued(&effects);
    assert!(second.generation > first.generation);

    // Newer batch lands first.
    let (state, _) = complete(
        state,
        second.generation,
        vec![
            ("a", FetchOutcome::Success(vec![product("a", "a1", 100.0)])),
            ("b", FetchOutcome::Success(vec![product("b", "b1", 200.0)])),
        ],
    );
    let expected = DisplayState::Results(vec![product("a", "a1", 100.0), product("b", "b1", 200.0)]);
    assert_eq!(state.display(), &expected);

    // The slow, older batch must not overwrite it.
    let (state, effects) = complete(
        state,
        first.generation,
        vec![("a", FetchOutcome::Failure("slow failure".into()))],
    );
    assert_eq!(state.display(), &expected);
    assert!(effects.is_empty());
}

#[test]
fn older_batch_arriving_first_keeps_loading() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a", "b"]), "a");
    let first = issued(&effects);
    let (state, effects) = toggle(state, "b");
    let second = issued(&effects);

    let (state, _) = complete(
        state,
        first.generation,
        vec![("a", FetchOutcome::Success(vec![product("a", "a1", 100.0)]))],
    );
    assert_eq!(state.display(), &DisplayState::Loading);

    let (state, _) = complete(
        state,
        second.generation,
        vec![("a", FetchOutcome::NotFound), ("b", FetchOutcome::NotFound)],
    );
    assert_eq!(state.display(), &DisplayState::EmptyNoProducts);
}

#[test]
fn final_state_matches_last_selection_for_any_completion_order() {
    init_logging();
    let outcome_for = |code: &str| match code {
        "a" => FetchOutcome::Success(vec![product("a", "a1", 100.0)]),
        "b" => FetchOutcome::NotFound,
        _ => FetchOutcome::Success(vec![product(code, "x1", 1200.0)]),
    };

    // Toggle a, b, c, then drop a: four batches in flight.
    let mut state = loaded(&["a", "b", "c"]);
    let mut batches = Vec::new();
    for code in ["a", "b", "c", "a"] {
        let (next, effects) = toggle(state, code);
        batches.push(issued(&effects));
        state = next;
    }

    // Deliver newest first, then the stale ones in reverse.
    for batch in batches.iter().rev() {
        let outcomes = batch
            .provider_codes
            .iter()
            .map(|code| (code.as_str(), outcome_for(code)))
            .collect();
        let (next, _) = complete(state, batch.generation, outcomes);
        state = next;
    }

    assert_eq!(
        state.display(),
        &DisplayState::Results(vec![product("c", "x1", 1200.0)])
    );
    assert_eq!(state.selection().selected_codes(), ["b", "c"]);
}

#[test]
fn bracket_change_after_results_refilters_without_fetching() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let batch = issued(&effects);
    let products = vec![product("a", "cheap", 399.0), product("a", "fast", 1299.0)];
    let (state, _) = complete(
        state,
        batch.generation,
        vec![("a", FetchOutcome::Success(products.clone()))],
    );
    let generation = state.current_generation();

    let (state, effects) = update(state, Msg::PriceBracketSelected(PriceBracket::High));
    assert!(effects.is_empty(), "re-filter stays in results: no fetch, no scroll");
    assert_eq!(state.current_generation(), generation);
    assert_eq!(
        state.display(),
        &DisplayState::Results(vec![product("a", "fast", 1299.0)])
    );

    let (state, effects) = update(state, Msg::PriceBracketSelected(PriceBracket::Mid));
    assert!(effects.is_empty());
    assert_eq!(state.display(), &DisplayState::EmptyFiltered);

    let (state, effects) = update(state, Msg::PriceBracketSelected(PriceBracket::Any));
    assert_eq!(effects, vec![Effect::ScrollToResults]);
    assert_eq!(state.display(), &DisplayState::Results(products));
}

#[test]
fn bracket_change_while_loading_issues_a_new_batch() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let first = issued(&effects);

    let (state, effects) = update(state, Msg::PriceBracketSelected(PriceBracket::High));
    let second = issued(&effects);
    assert_eq!(second.generation, first.generation + 1);
    assert_eq!(second.price_bracket, PriceBracket::High);
    assert_eq!(state.display(), &DisplayState::Loading);

    let outcomes = || vec![("a", FetchOutcome::Success(vec![product("a", "a1", 500.0)]))];
    let (state, _) = complete(state, first.generation, outcomes());
    assert_eq!(state.display(), &DisplayState::Loading);

    let (state, _) = complete(state, second.generation, outcomes());
    assert_eq!(state.display(), &DisplayState::EmptyFiltered);
}

#[test]
fn bracket_change_after_error_refetches() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let batch = issued(&effects);
    let (state, _) = complete(
        state,
        batch.generation,
        vec![("a", FetchOutcome::Failure("http status 500".into()))],
    );

    let (state, effects) = update(state, Msg::PriceBracketSelected(PriceBracket::Low));
    let retry = issued(&effects);
    assert_eq!(state.display(), &DisplayState::Loading);

    // The next successful batch clears the error.
    let (state, effects) = complete(
        state,
        retry.generation,
        vec![("a", FetchOutcome::Success(vec![product("a", "a1", 500.0)]))],
    );
    assert_eq!(
        state.display(),
        &DisplayState::Results(vec![product("a", "a1", 500.0)])
    );
    assert_eq!(effects, vec![Effect::ScrollToResults]);
}

#[test]
fn scroll_fires_once_per_arrival_of_results() {
    init_logging();
    let results = || vec![("a", FetchOutcome::Success(vec![product("a", "a1", 100.0)]))];

    let (state, effects) = toggle(loaded(&["a", "b"]), "a");
    let (state, scroll) = complete(state, issued(&effects).generation, results());
    assert_eq!(scroll, vec![Effect::ScrollToResults]);

    // A duplicate delivery of the resolved batch is stale and silent.
    let generation = state.current_generation();
    let (state, scroll) = complete(state, generation, results());
    assert!(scroll.is_empty());

    // A new selection goes through Loading, so results scroll again.
    let (state, effects) = toggle(state, "b");
    let (_state, scroll) = complete(
        state,
        issued(&effects).generation,
        vec![
            ("a", FetchOutcome::Success(vec![product("a", "a1", 100.0)])),
            ("b", FetchOutcome::NotFound),
        ],
    );
    assert_eq!(scroll, vec![Effect::ScrollToResults]);
}

#[test]
fn mismatched_products_are_not_trusted() {
    init_logging();
    let (state, effects) = toggle(loaded(&["a"]), "a");
    let batch = issued(&effects);

    let (state, _) = complete(
        state,
        batch.generation,
        vec![(
            "a",
            FetchOutcome::Success(vec![product("other", "o1", 100.0)]),
        )],
    );
    assert_eq!(state.display(), &DisplayState::EmptyNoProducts);
}
