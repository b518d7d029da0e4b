use std::collections::BTreeSet;

use log::{debug, info};

use super::narration::{Narrator, SilentNarrator};
use super::timer::Timer;
use crate::duration::extract_duration;
use crate::matcher::ingredients_for_step;
use crate::model::{Ingredient, Recipe};

/// State of one cook-mode run through a recipe.
///
/// Holds the step being viewed, at most one timer (which may belong to a
/// different step than the one on screen), and the ingredients checked off
/// per step. Nothing here outlives the session.
pub struct CookSession {
    recipe: Recipe,
    current: usize,
    timer: Option<Timer>,
    checked: BTreeSet<(usize, usize)>,
    narrator: Box<dyn Narrator>,
}

impl CookSession {
    pub fn new(recipe: Recipe) -> Self {
        Self::with_narrator(recipe, Box::new(SilentNarrator))
    }

    pub fn with_narrator(recipe: Recipe, narrator: Box<dyn Narrator>) -> Self {
        info!(
            "Starting cook mode for '{}' ({} steps)",
            recipe.name,
            recipe.steps.len()
        );
        CookSession {
            recipe,
            current: 0,
            timer: None,
            checked: BTreeSet::new(),
            narrator,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn step_count(&self) -> usize {
        self.recipe.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> Option<&str> {
        self.recipe.steps.get(self.current).map(String::as_str)
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.step_count()
    }

    /// Move to the next step. Returns false when already on the last one.
    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    /// Move to the previous step. Returns false when already on the first one.
    pub fn prev(&mut self) -> bool {
        match self.current.checked_sub(1) {
            Some(step) => self.go_to(step),
            None => false,
        }
    }

    /// Jump to `step`, clamped to the recipe's steps. Any read-aloud of the
    /// step being left is cancelled.
    pub fn go_to(&mut self, step: usize) -> bool {
        let last = self.step_count().saturating_sub(1);
        let target = step.min(last);
        if target == self.current {
            return false;
        }
        self.narrator.cancel();
        self.current = target;
        debug!("Now on step {}/{}", self.current + 1, self.step_count());
        true
    }

    /// Duration mentioned in the current step, if any.
    pub fn step_duration(&self) -> Option<u64> {
        self.current_step().and_then(extract_duration)
    }

    /// Start a timer for the current step.
    ///
    /// Requires a duration in the step text. A timer running for another
    /// step is replaced; a timer already bound to this step is left alone
    /// (use [`reset_timer`](Self::reset_timer) to restart it).
    pub fn start_timer(&mut self) -> bool {
        let Some(duration) = self.step_duration() else {
            return false;
        };
        if let Some(timer) = &self.timer {
            if timer.step() == self.current {
                return false;
            }
            debug!("Replacing timer for step {}", timer.step() + 1);
        }
        info!(
            "Timer started for step {}: {}s",
            self.current + 1,
            duration
        );
        self.timer = Some(Timer::start(self.current, duration));
        true
    }

    pub fn timer(&self) -> Option<&Timer> {
        self.timer.as_ref()
    }

    /// Whether a periodic tick source is needed right now.
    pub fn needs_ticker(&self) -> bool {
        self.timer.as_ref().is_some_and(Timer::is_running)
    }

    /// Advance the timer by one second. Returns true when this tick made it
    /// expire.
    pub fn tick(&mut self) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        let expired = timer.tick();
        if expired {
            info!("Timer for step {} finished", timer.step() + 1);
        }
        expired
    }

    pub fn toggle_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.toggle();
        }
    }

    pub fn reset_timer(&mut self) {
        if let Some(timer) = self.timer.as_mut() {
            timer.reset();
        }
    }

    pub fn stop_timer(&mut self) {
        if self.timer.take().is_some() {
            debug!("Timer dismissed");
        }
    }

    /// Ingredients referenced by the current step, with their recipe positions.
    pub fn step_ingredients(&self) -> Vec<(usize, &Ingredient)> {
        match self.current_step() {
            Some(step) => ingredients_for_step(step, &self.recipe.ingredients),
            None => Vec::new(),
        }
    }

    /// Flip the checked state of ingredient `ingredient` on step `step`.
    ///
    /// Returns the new state. Out-of-range positions are ignored.
    pub fn toggle_ingredient(&mut self, step: usize, ingredient: usize) -> bool {
        if step >= self.step_count() || ingredient >= self.recipe.ingredients.len() {
            return false;
        }
        let key = (step, ingredient);
        if self.checked.remove(&key) {
            false
        } else {
            self.checked.insert(key);
            true
        }
    }

    pub fn is_checked(&self, step: usize, ingredient: usize) -> bool {
        self.checked.contains(&(step, ingredient))
    }

    /// Read the current step aloud.
    pub fn read_aloud(&mut self) {
        if let Some(step) = self.recipe.steps.get(self.current) {
            self.narrator.speak(step);
        }
    }

    /// End the session, discarding the timer and checklist.
    pub fn finish(self) {
        info!("Leaving cook mode for '{}'", self.recipe.name);
    }
}

impl Drop for CookSession {
    fn drop(&mut self) {
        self.narrator.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingNarrator {
        spoken: Arc<AtomicUsize>,
        cancelled: Arc<AtomicUsize>,
    }

    impl Narrator for CountingNarrator {
        fn speak(&mut self, _text: &str) {
            self.spoken.fetch_add(1, Ordering::SeqCst);
        }

        fn cancel(&mut self) {
            self.cancelled.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn stew() -> Recipe {
        Recipe {
            name: "Chicken Stew".to_string(),
            ingredients: vec![
                Ingredient::new("Chicken Thighs", "600 g"),
                Ingredient::new("Carrots", "2"),
                Ingredient::new("Salt", "to taste"),
            ],
            steps: vec![
                "Chop the carrots".to_string(),
                "Brown the chicken for 5 minutes".to_string(),
                "Add carrots and simmer for 2 minutes".to_string(),
                "Season with salt".to_string(),
                "Rest for 1 hour".to_string(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut session = CookSession::new(stew());
        assert!(!session.prev());
        assert_eq!(session.current_index(), 0);

        for _ in 0..10 {
            session.next();
        }
        assert_eq!(session.current_index(), 4);
        assert!(session.is_last_step());
        assert!(!session.next());

        assert!(session.go_to(1));
        assert_eq!(session.current_step(), Some("Brown the chicken for 5 minutes"));
    }

    #[test]
    fn test_navigation_cancels_narration() {
        let narrator = CountingNarrator::default();
        let cancelled = narrator.cancelled.clone();
        let spoken = narrator.spoken.clone();
        let mut session = CookSession::with_narrator(stew(), Box::new(narrator));

        session.read_aloud();
        assert_eq!(spoken.load(Ordering::SeqCst), 1);
        session.next();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);

        // no movement, no cancel
        session.go_to(1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);

        drop(session);
        assert_eq!(cancelled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_start_timer_requires_duration() {
        let mut session = CookSession::new(stew());
        assert!(!session.start_timer());
        assert!(session.timer().is_none());
    }

    #[test]
    fn test_timer_survives_navigation() {
        let mut session = CookSession::new(stew());
        session.go_to(2);
        assert!(session.start_timer());
        session.go_to(4);
        session.tick();

        let timer = session.timer().unwrap();
        assert_eq!(timer.step(), 2);
        assert_eq!(timer.remaining(), 119);
        assert!(timer.is_running());
    }

    #[test]
    fn test_new_timer_replaces_other_step() {
        let mut session = CookSession::new(stew());
        session.go_to(1);
        assert!(session.start_timer());
        session.go_to(4);
        assert!(session.start_timer());

        let timer = session.timer().unwrap();
        assert_eq!(timer.step(), 4);
        assert_eq!(timer.duration(), 3600);
    }

    #[test]
    fn test_start_on_same_step_is_ignored() {
        let mut session = CookSession::new(stew());
        session.go_to(1);
        session.start_timer();
        session.tick();
        assert!(!session.start_timer());
        assert_eq!(session.timer().unwrap().remaining(), 299);
    }

    #[test]
    fn test_expiry_and_reset() {
        let mut session = CookSession::new(Recipe {
            steps: vec!["Wait 1 min".to_string()],
            ..Default::default()
        });
        session.start_timer();
        for _ in 0..59 {
            assert!(!session.tick());
        }
        assert_eq!(session.timer().unwrap().remaining(), 1);
        assert!(session.tick());

        let timer = session.timer().unwrap();
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        assert!(!session.needs_ticker());

        assert!(!session.tick());
        session.toggle_timer();
        assert!(!session.timer().unwrap().is_running());

        session.reset_timer();
        let timer = session.timer().unwrap();
        assert_eq!(timer.remaining(), 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_timer_controls_without_timer_are_noops() {
        let mut session = CookSession::new(stew());
        session.toggle_timer();
        session.reset_timer();
        session.stop_timer();
        assert!(!session.tick());
        assert!(session.timer().is_none());
    }

    #[test]
    fn test_stop_discards_timer() {
        let mut session = CookSession::new(stew());
        session.go_to(1);
        session.start_timer();
        assert!(session.needs_ticker());
        session.stop_timer();
        assert!(session.timer().is_none());
        assert!(!session.needs_ticker());
    }

    #[test]
    fn test_ingredient_checks_toggle_and_persist() {
        let mut session = CookSession::new(stew());
        assert!(session.toggle_ingredient(2, 1));
        session.go_to(4);
        session.go_to(2);
        assert!(session.is_checked(2, 1));
        assert!(!session.is_checked(1, 1));

        assert!(!session.toggle_ingredient(2, 1));
        assert!(!session.is_checked(2, 1));

        assert!(!session.toggle_ingredient(9, 0));
        assert!(!session.is_checked(9, 0));
    }

    #[test]
    fn test_checks_do_not_carry_to_new_session() {
        let mut session = CookSession::new(stew());
        session.toggle_ingredient(0, 1);
        session.finish();

        let session = CookSession::new(stew());
        assert!(!session.is_checked(0, 1));
    }

    #[test]
    fn test_step_ingredients() {
        let mut session = CookSession::new(stew());
        session.go_to(2);
        let indices: Vec<usize> = session.step_ingredients().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_empty_recipe() {
        let mut session = CookSession::new(Recipe::default());
        assert_eq!(session.current_step(), None);
        assert!(!session.next());
        assert!(!session.start_timer());
        assert!(session.step_ingredients().is_empty());
    }
}
