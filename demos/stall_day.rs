use stallsim::core::collaborators::{Pantry, ToolShed};
use stallsim::core::recipe::{CookingStep, IngredientUse, Recipe, RecipeBook};
use stallsim::{ShiftState, StallConfig, StallEngine, StallEvent, Topic};

fn menu() -> Vec<Recipe> {
    vec![
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
        },
        Recipe {
            id: "noodle_soup".to_string(),
            name: "Noodle Soup".to_string(),
            price: 18,
            steps: vec![
                CookingStep {
                    name: "boil".to_string(),
                    tool_id: "pot".to_string(),
                    ingredients: vec![IngredientUse {
                        ingredient_id: "noodles".to_string(),
                        quantity: 1,
                    }],
                    duration: 4.0,
                },
                CookingStep {
                    name: "garnish".to_string(),
                    tool_id: "knife".to_string(),
                    ingredients: vec![IngredientUse {
                        ingredient_id: "scallion".to_string(),
                        quantity: 1,
                    }],
                    duration: 1.5,
                },
            ],
            dish_weight: 400.0,
        },
    ]
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let mut config = StallConfig::default();
    config.random_seed = Some(42);
    config.shift.shift_duration_secs = 180.0;
    config.queue.customer_wait_secs = 60.0;

    println!("Starting one stall business day");
    println!("Configuration:");
    println!(
        "  Shift: {:.0}s, display slots: {}",
        config.shift.shift_duration_secs, config.queue.max_display_customers
    );
    println!(
        "  Spawn interval: {:.0}-{:.0}s, patience: {:.0}s",
        config.queue.spawn_interval_min_secs,
        config.queue.spawn_interval_max_secs,
        config.queue.customer_wait_secs
    );

    let mut pantry = Pantry::new();
    pantry.restock("egg", 200);
    pantry.restock("oil", 200);
    pantry.restock("noodles", 200);
    pantry.restock("scallion", 200);

    let mut tools = ToolShed::new();
    for tool in ["bowl", "wok", "pot", "knife"] {
        tools.acquire(tool);
    }

    let mut engine = StallEngine::new(
        config,
        RecipeBook::from_recipes(menu()),
        Box::new(pantry),
        Box::new(tools),
    );

    engine.bus_mut().subscribe(
        Topic::OrderCreated,
        "console",
        Box::new(|event| {
            if let StallEvent::OrderCreated(order) = event {
                println!("  + order for '{}'", order.recipe_id);
            }
            Ok(())
        }),
    );
    engine.bus_mut().subscribe(
        Topic::CustomerPaid,
        "console",
        Box::new(|event| {
            if let StallEvent::CustomerPaid { amount, .. } = event {
                println!("  $ paid {} gold", amount);
            }
            Ok(())
        }),
    );
    engine.bus_mut().subscribe(
        Topic::CustomerLeft,
        "console",
        Box::new(|_| {
            println!("  - a customer left unserved");
            Ok(())
        }),
    );

    engine.open_shift().expect("fresh engine opens");

    // Operator policy: keep the kitchen busy with the head customer's
    // order, serve the head dish to the first matching slot.
    while engine.shift_state() == ShiftState::Stalling {
        engine.tick(0.5);

        if !engine.pipeline().is_cooking() && engine.storage().is_empty() {
            if let Some(customer) = engine.queue().customer_at(0) {
                let recipe_id = customer.order.recipe_id.clone();
                let _ = engine.start_cooking(&recipe_id);
            }
        }

        if let Some(dish) = engine.storage().peek() {
            let recipe_id = dish.recipe_id.clone();
            let slot = engine
                .queue()
                .displayed()
                .iter()
                .position(|c| c.is_waiting() && c.order.recipe_id == recipe_id);
            if let Some(slot) = slot {
                let _ = engine.serve(slot);
            }
        }
    }

    println!();
    println!("Shift closed at {:.0}s", engine.now());
    for summary in engine.ledger().summaries() {
        println!(
            "Day {}: {} gold from {} customers, good-review rate {:.0}%",
            summary.day,
            summary.total_income,
            summary.customers_served,
            summary.good_review_rate * 100.0
        );
    }
    println!("Income history: {:?}", engine.ledger().history_by_day());
}
