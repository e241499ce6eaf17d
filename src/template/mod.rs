//! Deterministic-shape template generation.
//!
//! The template tier is the guaranteed-success stage of the fallback
//! chain: pure, no I/O, randomized only in which template it picks within
//! the rating's tone bucket. [`TemplateEngine`] is the seam the
//! orchestrator calls through, so tests can inject a failing engine to
//! exercise the emergency tier.

use std::sync::Arc;

use crate::random::RandomSource;
use crate::{GenerationRequest, Result};

/// Renders review text for a request. Implementations must not perform
/// I/O; the default [`TemplateGenerator`] never fails.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, request: &GenerationRequest) -> Result<String>;
}

// One bucket per rating. Placeholders: {subject}, {trip}, {nights},
// {highlights}. Each bucket's templates share an opening so tests can
// assert the tone without pinning exact wording.
const ONE_STAR: &[&str] = &[
    "Unfortunately, our {trip} at {subject} fell well short of expectations. \
     Over {nights} night(s), {highlights}. We would not stay again.",
    "Unfortunately, {subject} disappointed us on this {trip}. {highlights}, \
     and after {nights} night(s) we were glad to leave.",
    "Unfortunately, we cannot recommend {subject}. During our {nights}-night \
     {trip}, {highlights}, but the problems outweighed everything else.",
];

const TWO_STAR: &[&str] = &[
    "Our {trip} at {subject} was below average. {highlights}, though over \
     {nights} night(s) too much else went wrong.",
    "Our stay at {subject} left a lot to be desired. {highlights}, but the \
     {nights}-night {trip} never quite recovered.",
    "Our {nights} night(s) at {subject} were underwhelming for a {trip}. \
     {highlights}, yet we left unsatisfied.",
];

const THREE_STAR: &[&str] = &[
    "Overall, {subject} was a decent choice for a {trip}. {highlights}, and \
     the {nights}-night stay went smoothly enough.",
    "Overall, our {trip} at {subject} was average. {highlights}; for \
     {nights} night(s) it did the job without standing out.",
    "Overall, {subject} delivered a fair {nights}-night stay. {highlights}, \
     which made the {trip} perfectly acceptable.",
];

const FOUR_STAR: &[&str] = &[
    "We had a very good {trip} at {subject}. {highlights}, and our {nights} \
     night(s) there passed comfortably.",
    "We had a great {nights}-night stay at {subject}. {highlights}, and the \
     {trip} went almost without a hitch.",
    "We had an enjoyable {trip} at {subject}. {highlights}; {nights} \
     night(s) flew by and we would happily return.",
];

const FIVE_STAR: &[&str] = &[
    "An outstanding {trip} at {subject} from start to finish. {highlights}, \
     and every one of our {nights} night(s) was a pleasure.",
    "An outstanding stay — {subject} exceeded every expectation on our \
     {trip}. {highlights}, and {nights} night(s) were not nearly enough.",
    "An outstanding choice: {subject} made our {nights}-night {trip} \
     unforgettable. {highlights}. We cannot wait to come back.",
];

/// The fixed opening each rating bucket's templates begin with.
/// Exposed so callers (and tests) can recognise template output.
pub fn bucket_opening(rating: u8) -> &'static str {
    match rating {
        1 => "Unfortunately,",
        2 => "Our",
        3 => "Overall,",
        4 => "We had",
        _ => "An outstanding",
    }
}

fn bucket(rating: u8) -> &'static [&'static str] {
    match rating {
        1 => ONE_STAR,
        2 => TWO_STAR,
        3 => THREE_STAR,
        4 => FOUR_STAR,
        _ => FIVE_STAR,
    }
}

/// Join highlights into a natural-language clause.
///
/// 0 → generic filler, 1 → "the X stood out", 2 → "X and Y were notable",
/// ≥3 → Oxford-comma list.
pub fn highlights_clause(highlights: &[String]) -> String {
    match highlights {
        [] => "everything was much as expected".to_string(),
        [only] => format!("the {only} stood out"),
        [first, second] => format!("{first} and {second} were notable"),
        [init @ .., last] => {
            format!("{}, and {} were the highlights", init.join(", "), last)
        }
    }
}

/// Pure template-based review generator.
///
/// Picks uniformly at random within the rating's bucket via the injected
/// [`RandomSource`] — the only variability when no provider succeeds.
pub struct TemplateGenerator {
    random: Arc<dyn RandomSource>,
}

impl TemplateGenerator {
    pub fn new(random: Arc<dyn RandomSource>) -> Self {
        Self { random }
    }
}

impl TemplateEngine for TemplateGenerator {
    fn render(&self, request: &GenerationRequest) -> Result<String> {
        let templates = bucket(request.rating);
        let template = templates[self.random.pick(templates.len())];
        Ok(template
            .replace("{subject}", &request.subject_name)
            .replace("{trip}", request.trip_type.phrase())
            .replace("{nights}", &request.stay_length.to_string())
            .replace("{highlights}", &highlights_clause(&request.highlights)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TripType;
    use crate::random::ThreadRngSource;

    fn request(rating: u8) -> GenerationRequest {
        GenerationRequest::new("Grand Hotel", rating, TripType::Leisure)
            .unwrap()
            .stay_length(3)
    }

    /// Deterministic source that always picks the given index.
    struct FixedPick(usize);

    impl RandomSource for FixedPick {
        fn pick(&self, bound: usize) -> usize {
            self.0.min(bound - 1)
        }

        fn percent(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn every_rating_starts_with_its_bucket_opening() {
        let generator = TemplateGenerator::new(Arc::new(ThreadRngSource));
        for rating in 1..=5 {
            let text = generator.render(&request(rating)).unwrap();
            assert!(
                text.starts_with(bucket_opening(rating)),
                "rating {rating}: {text:?}"
            );
        }
    }

    #[test]
    fn output_mentions_subject_and_nights() {
        let generator = TemplateGenerator::new(Arc::new(ThreadRngSource));
        let text = generator.render(&request(5)).unwrap();
        assert!(text.contains("Grand Hotel"));
        assert!(text.contains('3'));
        assert!(!text.contains('{'), "unreplaced placeholder in {text:?}");
    }

    #[test]
    fn fixed_source_makes_output_exact() {
        let generator = TemplateGenerator::new(Arc::new(FixedPick(0)));
        let text = generator.render(&request(3)).unwrap();
        assert_eq!(
            text,
            "Overall, Grand Hotel was a decent choice for a leisure stay. \
             everything was much as expected, and the 3-night stay went \
             smoothly enough."
        );
    }

    #[test]
    fn highlights_clause_cardinalities() {
        assert_eq!(highlights_clause(&[]), "everything was much as expected");
        assert_eq!(
            highlights_clause(&["pool".to_string()]),
            "the pool stood out"
        );
        assert_eq!(
            highlights_clause(&["pool".to_string(), "breakfast".to_string()]),
            "pool and breakfast were notable"
        );
        assert_eq!(
            highlights_clause(&[
                "pool".to_string(),
                "breakfast".to_string(),
                "spa".to_string()
            ]),
            "pool, breakfast, and spa were the highlights"
        );
    }
}
