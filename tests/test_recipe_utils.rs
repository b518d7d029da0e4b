use recipe_assistant::scaling::parse_leading_quantity;
use recipe_assistant::{extract_duration, ingredients_for_step, scale_amount, Ingredient};

#[test]
fn test_duration_examples() {
    assert_eq!(extract_duration("Simmer for 10 minutes"), Some(600));
    assert_eq!(extract_duration("Bake for 1 hour"), Some(3600));
    assert_eq!(extract_duration("Marinate for 10-15 mins"), Some(600));
    assert_eq!(extract_duration("1.5 hrs in the oven"), Some(5400));
    assert_eq!(extract_duration("Add salt to taste"), None);
}

#[test]
fn test_duration_ranges_and_fractions_in_generated_steps() {
    assert_eq!(extract_duration("Simmer for 10–15 minutes"), Some(600));
    assert_eq!(extract_duration("Simmer for 10 to 15 minutes"), Some(600));
    assert_eq!(extract_duration("Roast for 1 1/2 hours"), Some(5400));
}

#[test]
fn test_duration_ignores_bare_numbers() {
    assert_eq!(extract_duration("Preheat the oven to 200 degrees"), None);
    assert_eq!(extract_duration("Cut into 4 pieces, then fry for 3 min"), Some(180));
}

#[test]
fn test_scaling_examples() {
    assert_eq!(scale_amount("200 g", 2, 4), "400 g");
    assert_eq!(scale_amount("1/2 cup", 2, 1), "1/4 cup");
    assert_eq!(scale_amount("a pinch", 2, 4), "a pinch");
    assert_eq!(scale_amount("1 1/2 cups", 4, 2), "3/4 cups");
    assert_eq!(scale_amount("100 ml", 0, 3), scale_amount("100 ml", 1, 3));
    assert_eq!(scale_amount("100 ml", -2, 3), "300 ml");
}

#[test]
fn test_scaling_keeps_descriptive_suffix() {
    assert_eq!(
        scale_amount("2 large eggs, beaten", 2, 3),
        "3 large eggs, beaten"
    );
    assert_eq!(scale_amount("  1.5 cups milk", 3, 1), "1/2 cups milk");
}

#[test]
fn test_scaling_same_servings_is_numerically_equal() {
    for amount in ["200 g", "1/2 cup", "1 1/2 cups", "0.75 l", "½ tsp", "2-3 cloves"] {
        let scaled = scale_amount(amount, 5, 5);
        let (before, _) = parse_leading_quantity(amount).unwrap();
        let (after, _) = parse_leading_quantity(&scaled).unwrap();
        assert!((before - after).abs() < 1e-9, "{} became {}", amount, scaled);
    }
}

#[test]
fn test_matcher_examples() {
    let ingredients = vec![
        Ingredient::new("Chicken Breast", "2"),
        Ingredient::new("Salt", "1 tsp"),
    ];

    let matched = ingredients_for_step("Season the chicken with salt", &ingredients);
    let names: Vec<&str> = matched.iter().map(|(_, i)| i.name.as_str()).collect();
    assert_eq!(names, vec!["Chicken Breast", "Salt"]);

    assert!(ingredients_for_step("Add the broth,", &ingredients).is_empty());
}
