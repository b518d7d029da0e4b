use recipe_assistant::{CookSession, Ingredient, Recipe};

fn lasagne() -> Recipe {
    Recipe {
        name: "Lasagne".to_string(),
        servings: 4,
        ingredients: vec![
            Ingredient::new("Beef Mince", "500 g"),
            Ingredient::new("Lasagne Sheets", "12"),
            Ingredient::new("Mozzarella", "250 g"),
        ],
        steps: vec![
            "Preheat the oven".to_string(),
            "Brown the beef".to_string(),
            "Simmer the sauce for 20 minutes".to_string(),
            "Layer sheets and sauce".to_string(),
            "Top with mozzarella and bake for 45 minutes".to_string(),
        ],
        ..Default::default()
    }
}

#[test]
fn test_timer_stays_bound_to_its_step() {
    let mut session = CookSession::new(lasagne());
    session.go_to(2);
    assert!(session.start_timer());

    session.next();
    session.next();
    assert_eq!(session.current_index(), 4);
    session.tick();

    let timer = session.timer().unwrap();
    assert_eq!(timer.step(), 2);
    assert_eq!(timer.remaining(), 20 * 60 - 1);
    assert!(timer.is_running());
}

#[test]
fn test_last_tick_expires_timer() {
    let mut session = CookSession::new(Recipe {
        steps: vec!["Steam for 1 min".to_string()],
        ..Default::default()
    });
    session.start_timer();
    for _ in 0..59 {
        session.tick();
    }
    assert_eq!(session.timer().unwrap().remaining(), 1);

    assert!(session.tick());
    let timer = session.timer().unwrap();
    assert_eq!(timer.remaining(), 0);
    assert!(!timer.is_running());

    for _ in 0..5 {
        assert!(!session.tick());
    }
    assert_eq!(session.timer().unwrap().remaining(), 0);

    session.reset_timer();
    let timer = session.timer().unwrap();
    assert_eq!(timer.remaining(), timer.duration());
    assert!(!timer.is_running());
}

#[test]
fn test_pause_and_resume() {
    let mut session = CookSession::new(lasagne());
    session.go_to(4);
    session.start_timer();

    session.toggle_timer();
    assert!(!session.needs_ticker());
    session.tick();
    assert_eq!(session.timer().unwrap().remaining(), 45 * 60);

    session.toggle_timer();
    session.tick();
    assert_eq!(session.timer().unwrap().remaining(), 45 * 60 - 1);
}

#[test]
fn test_double_toggle_unchecks() {
    let mut session = CookSession::new(lasagne());
    session.go_to(4);
    let (index, _) = session.step_ingredients()[0];
    assert_eq!(index, 2);

    session.toggle_ingredient(4, index);
    assert!(session.is_checked(4, index));
    session.toggle_ingredient(4, index);
    assert!(!session.is_checked(4, index));
}

#[test]
fn test_step_without_duration_cannot_start_timer() {
    let mut session = CookSession::new(lasagne());
    assert!(session.step_duration().is_none());
    assert!(!session.start_timer());
    assert!(session.timer().is_none());
}
