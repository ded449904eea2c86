use crate::core::collaborators::{Pantry, ToolShed};
use crate::core::config::StallConfig;
use crate::core::errors::{CookingError, ServeError};
use crate::core::events::{StallEvent, Topic};
use crate::core::recipe::{CookingStep, IngredientUse, Recipe, RecipeBook};
use crate::core::shift_clock::ShiftState;
use crate::core::stall::StallEngine;
use std::cell::RefCell;
use std::rc::Rc;

fn egg_fry() -> Recipe {
    Recipe {
        id: "egg_fry".to_string(),
        name: "Fried Egg".to_string(),
        price: 12,
        steps: vec![
            CookingStep {
                name: "crack".to_string(),
                tool_id: "bowl".to_string(),
                ingredients: vec![IngredientUse {
                    ingredient_id: "egg".to_string(),
                    quantity: 2,
                }],
                duration: 2.0,
            },
            CookingStep {
                name: "fry".to_string(),
                tool_id: "wok".to_string(),
                ingredients: vec![IngredientUse {
                    ingredient_id: "oil".to_string(),
                    quantity: 1,
                }],
                duration: 3.0,
            },
        ],
        dish_weight: 150.0,
    }
}

fn noodle() -> Recipe {
    Recipe {
        id: "noodle".to_string(),
        name: "Noodle Bowl".to_string(),
        price: 18,
        steps: vec![CookingStep {
            name: "boil".to_string(),
            tool_id: "pot".to_string(),
            ingredients: vec![IngredientUse {
                ingredient_id: "noodles".to_string(),
                quantity: 1,
            }],
            duration: 4.0,
        }],
        dish_weight: 350.0,
    }
}

fn engine_with_seed(seed: u64, shift_secs: f64) -> StallEngine {
    let mut config = StallConfig::default();
    config.random_seed = Some(seed);
    config.shift.shift_duration_secs = shift_secs;

    let mut pantry = Pantry::new();
    pantry.restock("egg", 100);
    pantry.restock("oil", 100);
    pantry.restock("noodles", 100);

    let mut tools = ToolShed::new();
    tools.acquire("bowl");
    tools.acquire("wok");
    tools.acquire("pot");

    StallEngine::new(
        config,
        RecipeBook::from_recipes(vec![egg_fry(), noodle()]),
        Box::new(pantry),
        Box::new(tools),
    )
}

/// Cook the given recipe to completion through the public tick API.
fn cook(engine: &mut StallEngine, recipe_id: &str) {
    let duration = engine
        .recipes()
        .get(recipe_id)
        .expect("recipe registered")
        .total_duration();
    engine.start_cooking(recipe_id).expect("start accepted");
    engine.tick(duration);
}

#[test]
fn test_serve_flow_updates_every_downstream_component() {
    let mut engine = engine_with_seed(42, 900.0);
    engine.open_shift().unwrap();
    engine.tick(0.5);
    assert_eq!(engine.queue().displayed_count(), 1);

    let wanted = engine
        .queue()
        .customer_at(0)
        .unwrap()
        .order
        .recipe_id
        .clone();
    cook(&mut engine, &wanted);
    assert_eq!(engine.storage().len(), 1);

    let amount = engine.serve(0).expect("matching dish serves");
    assert!(amount > 0);
    assert_eq!(engine.gold(), amount);
    assert_eq!(engine.payment().customers_served(), 1);
    assert_eq!(engine.payment().day_earnings(), amount);
    assert_eq!(engine.evaluation().total_served(), 1);
    assert_eq!(engine.ledger().records().len(), 1);
    assert_eq!(engine.ledger().records()[0].amount, amount);
    assert!(engine.storage().is_empty());
}

#[test]
fn test_wrong_recipe_returns_dish_to_storage() {
    let mut engine = engine_with_seed(42, 900.0);
    engine.open_shift().unwrap();
    engine.tick(0.5);

    let wanted = engine
        .queue()
        .customer_at(0)
        .unwrap()
        .order
        .recipe_id
        .clone();
    let other = if wanted == "egg_fry" { "noodle" } else { "egg_fry" };
    cook(&mut engine, other);
    let stored_before = engine.storage().len();

    let result = engine.serve(0);
    assert!(matches!(result, Err(ServeError::WrongRecipe { .. })));
    // Net storage count unchanged; the dish went back to the head.
    assert_eq!(engine.storage().len(), stored_before);
    assert!(engine.storage().peek().is_some());
    assert!(!engine.storage().peek().unwrap().is_served);
    assert!(engine.queue().customer_at(0).unwrap().is_waiting());
    assert_eq!(engine.gold(), 0);
    assert_eq!(engine.evaluation().total_served(), 0);
}

#[test]
fn test_serve_failures_have_no_side_effects() {
    let mut engine = engine_with_seed(42, 900.0);
    engine.open_shift().unwrap();
    engine.tick(0.5);

    // Storage empty.
    assert_eq!(engine.serve(0), Err(ServeError::NoDishReady));
    // Slot out of bounds.
    assert_eq!(engine.serve(99), Err(ServeError::InvalidSlot(99)));
    assert_eq!(engine.gold(), 0);
    assert_eq!(engine.ledger().records().len(), 0);
}

#[test]
fn test_tool_registry_gates_use_tool() {
    let mut engine = engine_with_seed(42, 900.0);
    engine.open_shift().unwrap();
    engine.start_cooking("egg_fry").unwrap();

    assert_eq!(
        engine.use_tool("laser"),
        Err(CookingError::UnknownTool("laser".to_string()))
    );

    // Known and owned: completes the first step.
    engine.use_tool("bowl").unwrap();
    assert_eq!(engine.pipeline().session().unwrap().step_index, 1);
}

#[test]
fn test_countdown_expiry_rolls_the_day_over() {
    let mut engine = engine_with_seed(42, 60.0);
    engine.open_shift().unwrap();
    engine.tick(0.5);

    let wanted = engine
        .queue()
        .customer_at(0)
        .unwrap()
        .order
        .recipe_id
        .clone();
    cook(&mut engine, &wanted);
    let amount = engine.serve(0).unwrap();

    // Leave an unserved dish and a fresh session behind, then let the
    // countdown expire.
    cook(&mut engine, &wanted);
    engine.start_cooking(&wanted).unwrap();
    engine.tick(60.0);

    assert_eq!(engine.shift_state(), ShiftState::Closed);
    assert_eq!(engine.current_day(), 2);
    assert!(!engine.pipeline().is_cooking());
    assert!(engine.storage().is_empty());
    assert_eq!(engine.queue().total_count(), 0);

    // Rollup captured the day exactly once and reset the counters.
    assert_eq!(engine.ledger().summaries().len(), 1);
    assert_eq!(engine.ledger().summaries()[0].total_income, amount);
    assert_eq!(engine.payment().day_earnings(), 0);
    assert_eq!(engine.evaluation().total_served(), 0);
    assert_eq!(engine.ledger().history_by_day().get(&1), Some(&amount));

    // A further tick must not roll up again.
    engine.tick(10.0);
    assert_eq!(engine.current_day(), 2);
    assert_eq!(engine.ledger().summaries().len(), 1);

    // The next day opens cleanly.
    engine.reset_to_idle().unwrap();
    engine.open_shift().unwrap();
    assert_eq!(engine.shift_state(), ShiftState::Stalling);
    assert_eq!(engine.shift_remaining(), 60.0);
}

#[test]
fn test_explicit_close_uses_same_rollup_path() {
    let mut engine = engine_with_seed(42, 900.0);
    engine.open_shift().unwrap();
    engine.tick(0.5);

    engine.close_shift().unwrap();
    assert_eq!(engine.shift_state(), ShiftState::Closed);
    assert_eq!(engine.current_day(), 2);
    assert_eq!(engine.queue().total_count(), 0);
    assert!(engine.close_shift().is_err(), "Close is not re-entrant");
}

#[test]
fn test_bus_observers_see_the_day_unfold() {
    let mut engine = engine_with_seed(42, 900.0);

    let orders = Rc::new(RefCell::new(0));
    let paid = Rc::new(RefCell::new(Vec::new()));

    let order_count = orders.clone();
    engine.bus_mut().subscribe(
        Topic::OrderCreated,
        "test-orders",
        Box::new(move |_| {
            *order_count.borrow_mut() += 1;
            Ok(())
        }),
    );
    let payments = paid.clone();
    engine.bus_mut().subscribe(
        Topic::CustomerPaid,
        "test-payments",
        Box::new(move |event| {
            if let StallEvent::CustomerPaid { amount, .. } = event {
                payments.borrow_mut().push(*amount);
            }
            Ok(())
        }),
    );

    engine.open_shift().unwrap();
    engine.tick(0.5);
    assert_eq!(*orders.borrow(), 1);

    let wanted = engine
        .queue()
        .customer_at(0)
        .unwrap()
        .order
        .recipe_id
        .clone();
    cook(&mut engine, &wanted);
    let amount = engine.serve(0).unwrap();
    assert_eq!(*paid.borrow(), vec![amount]);
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let mut first = engine_with_seed(1234, 900.0);
    let mut second = engine_with_seed(1234, 900.0);

    for engine in [&mut first, &mut second] {
        engine.open_shift().unwrap();
        for _ in 0..120 {
            engine.tick(1.0);
        }
    }

    let snapshot = |engine: &StallEngine| {
        engine
            .queue()
            .displayed()
            .iter()
            .map(|c| (c.name.clone(), c.order.recipe_id.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(first.queue().total_count(), second.queue().total_count());
    assert_eq!(snapshot(&first), snapshot(&second));
}

#[test]
fn test_displayed_capacity_and_priority_hold_under_load() {
    let mut engine = engine_with_seed(7, 900.0);
    engine.open_shift().unwrap();

    for _ in 0..600 {
        engine.tick(1.0);
        let displayed = engine.queue().displayed();
        assert!(displayed.len() <= engine.config().queue.max_display_customers);
        for (index, customer) in displayed.iter().enumerate() {
            assert_eq!(customer.is_priority, index == 0);
        }
    }
}
