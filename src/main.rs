use std::error::Error;

use clap::{Parser, Subcommand};
use log::{debug, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use recipe_assistant::config::AssistantConfig;
use recipe_assistant::cook::{LogNarrator, Ticker};
use recipe_assistant::duration::format_clock;
use recipe_assistant::{
    extract_duration, scale_amount, scale_recipe, CookSession, JsonFileStore, Meal,
    ProviderKind, Recipe, RecipeFilter, RecipeGenerator, Store, Theme, Weekday,
};

#[derive(Parser, Debug)]
#[command(name = "recipe-assistant")]
#[command(about = "Turn the ingredients you have into recipes, plan the week and cook step by step")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a provider for recipes using these ingredients
    Generate {
        #[arg(required = true)]
        ingredients: Vec<String>,
        #[arg(long)]
        cuisine: Option<String>,
        #[arg(long)]
        diet: Option<String>,
        #[arg(long, default_value_t = 3)]
        count: u32,
        /// openai, anthropic, google or ollama
        #[arg(long)]
        provider: Option<String>,
        #[arg(long)]
        model: Option<String>,
        /// API key for the provider; remembered for later runs
        #[arg(long)]
        api_key: Option<String>,
        /// Save every generated recipe
        #[arg(long)]
        save: bool,
    },
    /// List saved recipes
    Saved {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        /// Only recipes that cook within this many minutes
        #[arg(long)]
        max_minutes: Option<u64>,
    },
    /// Show a saved recipe, optionally scaled to a serving count
    Show {
        name: String,
        #[arg(long)]
        servings: Option<u32>,
    },
    /// Delete a saved recipe (and its meal plan slots)
    Remove { name: String },
    /// Weekly meal plan
    Plan {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Scale one amount between serving counts
    Scale {
        amount: String,
        #[arg(long)]
        from: i64,
        #[arg(long)]
        to: i64,
    },
    /// Print the duration found in a piece of step text, in seconds
    Duration { text: String },
    /// Cook a saved recipe step by step
    Cook {
        name: String,
        #[arg(long)]
        servings: Option<u32>,
    },
    /// Set the display theme
    Theme { theme: String },
}

#[derive(Subcommand, Debug)]
enum PlanAction {
    /// Show the whole week
    Show,
    /// Put a saved recipe in a slot
    Assign {
        day: String,
        meal: String,
        recipe: String,
    },
    /// Empty one slot
    Unassign { day: String, meal: String },
    /// Empty the whole week
    Clear,
    /// Ingredients needed for the planned week
    Shopping,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AssistantConfig::load()?;
    let store = JsonFileStore::new(config.storage.path.clone());
    debug!("Using data file {}", store.path().display());

    match cli.command {
        Command::Generate {
            ingredients,
            cuisine,
            diet,
            count,
            provider,
            model,
            api_key,
            save,
        } => {
            let mut data = store.load().await?;
            let mut builder = RecipeGenerator::builder()
                .ingredients(ingredients)
                .count(count)
                .config(config.clone());
            if let Some(cuisine) = cuisine {
                builder = builder.cuisine(cuisine);
            }
            if let Some(diet) = diet {
                builder = builder.diet(diet);
            }
            if let Some(provider) = provider {
                builder = builder.provider(provider.parse::<ProviderKind>()?);
            }
            if let Some(model) = model {
                builder = builder.model(model);
            }
            if let Some(key) = api_key.clone().or_else(|| data.api_key.clone()) {
                builder = builder.api_key(key);
            }

            let recipes = builder.build().await?;
            for recipe in &recipes {
                print_summary(recipe);
            }

            let mut changed = false;
            if api_key.is_some() && api_key != data.api_key {
                data.api_key = api_key;
                changed = true;
            }
            if save {
                for recipe in recipes {
                    data.saved.save(recipe);
                }
                changed = true;
            }
            if changed {
                store.save(&data).await?;
            }
        }
        Command::Saved {
            query,
            tag,
            difficulty,
            max_minutes,
        } => {
            let data = store.load().await?;
            let filter = RecipeFilter {
                query,
                tag,
                difficulty,
                max_minutes,
            };
            let matches = data.saved.filter(&filter);
            if matches.is_empty() {
                println!("No saved recipes match.");
            }
            for recipe in matches {
                print_summary(recipe);
            }
            let tags = data.saved.tags();
            if !tags.is_empty() {
                println!(
                    "\nTags: {}",
                    tags.into_iter().collect::<Vec<_>>().join(", ")
                );
            }
        }
        Command::Show { name, servings } => {
            let data = store.load().await?;
            let recipe = find_saved(&data.saved, &name)?;
            let recipe = match servings {
                Some(servings) => scale_recipe(recipe, config.cook.clamp_servings(servings)),
                None => recipe.clone(),
            };
            print_recipe(&recipe);
        }
        Command::Remove { name } => {
            let mut data = store.load().await?;
            match data.saved.remove(&name) {
                Some(recipe) => {
                    let cleared = data.plan.remove_recipe(&recipe.name);
                    store.save(&data).await?;
                    println!(
                        "Removed '{}' ({} meal plan slot(s) cleared)",
                        recipe.name, cleared
                    );
                }
                None => println!("No saved recipe named '{}'", name),
            }
        }
        Command::Plan { action } => run_plan(&store, action).await?,
        Command::Scale { amount, from, to } => {
            println!("{}", scale_amount(&amount, from, to));
        }
        Command::Duration { text } => match extract_duration(&text) {
            Some(seconds) => println!("{} ({})", seconds, format_clock(seconds)),
            None => println!("No duration found"),
        },
        Command::Cook { name, servings } => {
            let data = store.load().await?;
            let recipe = find_saved(&data.saved, &name)?;
            let recipe = match servings {
                Some(servings) => scale_recipe(recipe, config.cook.clamp_servings(servings)),
                None => recipe.clone(),
            };
            cook(recipe).await?;
        }
        Command::Theme { theme } => {
            let theme = match theme.to_ascii_lowercase().as_str() {
                "light" => Theme::Light,
                "dark" => Theme::Dark,
                "system" => Theme::System,
                other => return Err(format!("Unknown theme: {}", other).into()),
            };
            let mut data = store.load().await?;
            data.theme = theme;
            store.save(&data).await?;
        }
    }

    Ok(())
}

fn find_saved<'a>(
    book: &'a recipe_assistant::RecipeBook,
    name: &str,
) -> Result<&'a Recipe, Box<dyn Error>> {
    book.get(name)
        .ok_or_else(|| format!("No saved recipe named '{}'", name).into())
}

async fn run_plan(store: &JsonFileStore, action: PlanAction) -> Result<(), Box<dyn Error>> {
    let mut data = store.load().await?;
    match action {
        PlanAction::Show => {
            for day in Weekday::ALL {
                let meals = data.plan.day(day);
                if meals.is_empty() {
                    continue;
                }
                println!("{}", day);
                for (meal, recipe) in meals {
                    println!("  {:<10} {}", meal, recipe.name);
                }
            }
            if data.plan.is_empty() {
                println!("Nothing planned yet.");
            }
        }
        PlanAction::Assign { day, meal, recipe } => {
            let day: Weekday = day.parse()?;
            let meal: Meal = meal.parse()?;
            let recipe = find_saved(&data.saved, &recipe)?.clone();
            println!("{} {}: {}", day, meal, recipe.name);
            if let Some(previous) = data.plan.assign(day, meal, recipe) {
                println!("(replaced {})", previous.name);
            }
            store.save(&data).await?;
        }
        PlanAction::Unassign { day, meal } => {
            let day: Weekday = day.parse()?;
            let meal: Meal = meal.parse()?;
            if data.plan.unassign(day, meal).is_some() {
                store.save(&data).await?;
            }
        }
        PlanAction::Clear => {
            data.plan.clear();
            store.save(&data).await?;
        }
        PlanAction::Shopping => {
            for item in data.plan.shopping_list() {
                if item.amounts.is_empty() {
                    println!("- {}", item.name);
                } else {
                    println!("- {}: {}", item.name, item.amounts.join(" + "));
                }
            }
        }
    }
    Ok(())
}

fn print_summary(recipe: &Recipe) {
    println!("{} [{}]", recipe.name, recipe.difficulty);
    if !recipe.description.is_empty() {
        println!("  {}", recipe.description);
    }
    println!(
        "  prep {} | cook {} | serves {} | {}",
        recipe.prep_time, recipe.cook_time, recipe.servings, recipe.calories
    );
}

fn print_recipe(recipe: &Recipe) {
    print_summary(recipe);
    println!("\nIngredients:");
    for ingredient in &recipe.ingredients {
        println!("  - {} {}", ingredient.amount, ingredient.name);
    }
    println!("\nSteps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
    if let Some(nutrition) = &recipe.nutrition {
        println!(
            "\nProtein {} | Carbs {} | Fat {}",
            nutrition.protein, nutrition.carbs, nutrition.fat
        );
    }
    if let Some(drink) = &recipe.drink_pairing {
        println!("Pairs with: {}", drink);
    }
}

const COOK_HELP: &str = "n next | p prev | t start timer | space/pause | r reset | x stop timer | g go to timer step | c <n> check ingredient | s read aloud | q quit";

fn print_step(session: &CookSession) {
    let Some(step) = session.current_step() else {
        println!("This recipe has no steps.");
        return;
    };
    let index = session.current_index();
    println!("\nStep {}/{}: {}", index + 1, session.step_count(), step);
    for (position, ingredient) in session.step_ingredients() {
        let mark = if session.is_checked(index, position) { "x" } else { " " };
        println!("  [{}] {} {} ({})", mark, ingredient.amount, ingredient.name, position + 1);
    }
    if let Some(seconds) = session.step_duration() {
        println!("  timer available: {}", format_clock(seconds));
    }
    if let Some(timer) = session.timer() {
        if timer.step() != index {
            println!(
                "  timer for step {}: {} (g to go there)",
                timer.step() + 1,
                format_clock(timer.remaining())
            );
        }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> Option<()> {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending().await,
    }
}

async fn cook(recipe: Recipe) -> Result<(), Box<dyn Error>> {
    let mut session = CookSession::with_narrator(recipe, Box::new(LogNarrator::default()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker: Option<Ticker> = None;

    println!("{}", COOK_HELP);
    print_step(&session);

    loop {
        // Only tick while a timer is actually running
        match (session.needs_ticker(), ticker.is_some()) {
            (true, false) => ticker = Some(Ticker::start()),
            (false, true) => ticker = None,
            _ => {}
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let mut parts = line.split_whitespace();
                let command = if line.starts_with(' ') && line.trim().is_empty() {
                    "pause"
                } else {
                    parts.next().unwrap_or("")
                };
                match command {
                    "n" | "next" => {
                        if session.next() {
                            print_step(&session);
                        }
                    }
                    "p" | "prev" => {
                        if session.prev() {
                            print_step(&session);
                        }
                    }
                    "g" | "goto" => {
                        if let Some(step) = session.timer().map(|t| t.step()) {
                            session.go_to(step);
                            print_step(&session);
                        }
                    }
                    "t" | "timer" => {
                        if session.start_timer() {
                            if let Some(timer) = session.timer() {
                                println!("Timer started: {}", format_clock(timer.duration()));
                            }
                        } else {
                            println!("No timer to start for this step.");
                        }
                    }
                    "pause" | "resume" => session.toggle_timer(),
                    "r" | "reset" => session.reset_timer(),
                    "x" | "stop" => session.stop_timer(),
                    "c" | "check" => {
                        let position = parts.next().and_then(|n| n.parse::<usize>().ok());
                        match position {
                            Some(n) if n > 0 => {
                                let step = session.current_index();
                                session.toggle_ingredient(step, n - 1);
                                print_step(&session);
                            }
                            _ => println!("Usage: c <ingredient number>"),
                        }
                    }
                    "s" | "say" => session.read_aloud(),
                    "q" | "quit" => break,
                    "" => {}
                    other => {
                        warn!("Unknown command '{}'", other);
                        println!("{}", COOK_HELP);
                    }
                }
            }
            Some(()) = next_tick(&mut ticker) => {
                if session.tick() {
                    if let Some(timer) = session.timer() {
                        println!("\x07Timer for step {} is done!", timer.step() + 1);
                    }
                } else if let Some(timer) = session.timer() {
                    if timer.remaining() % 10 == 0 {
                        println!("  {} left", format_clock(timer.remaining()));
                    }
                }
            }
        }
    }

    drop(ticker);
    session.finish();
    Ok(())
}
