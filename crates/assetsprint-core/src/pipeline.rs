//! Generation pipeline
//!
//! The pipeline drives a [`ContentGenerator`] through a fixed sequence of
//! steps and assembles the result into an [`AssetPackage`]:
//!
//! ```text
//! Idle -> Researching -> Structuring -> Drafting -> Designing -> Finalizing -> Completed
//!              \              \             \            \             \
//!               +--------------+-------------+------------+-------------+--> Failed
//! ```
//!
//! Only research and outlining are fatal. A failed cover leaves the asset
//! without an image, a failed value stack is replaced by the default one and
//! a failed chapter receives fallback content; see [`crate::ingest`].
//!
//! Chapters are drafted concurrently, one scoped thread per outline section.
//! Each result carries its outline index and results are re-sorted by that
//! index before assembly, never by completion order.

use std::fmt;

use assetsprint_ast::{AssetPackage, Bonus, CoverImage, Oto, Workbook};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, GeneratorError, Result};
use crate::ingest::{
    default_cover_prompt, GeneratedAsset, GeneratedChapter, GeneratedValueStack,
};

/// Externally observable progress of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Researching,
    Structuring,
    Drafting,
    Designing,
    Finalizing,
    Completed,
    Failed,
}

/// Result of the step performed in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// The step finished (possibly with a tolerated fallback)
    Done,
    /// The step failed and the run cannot continue
    Failed,
}

impl GenerationPhase {
    /// Pure transition function
    ///
    /// Terminal phases absorb every input.
    pub fn advance(self, step: StepResult) -> Self {
        use GenerationPhase::*;

        match (self, step) {
            (Completed, _) | (Failed, _) => self,
            (_, StepResult::Failed) => Failed,
            (Idle, StepResult::Done) => Researching,
            (Researching, StepResult::Done) => Structuring,
            (Structuring, StepResult::Done) => Drafting,
            (Drafting, StepResult::Done) => Designing,
            (Designing, StepResult::Done) => Finalizing,
            (Finalizing, StepResult::Done) => Completed,
        }
    }

    /// Check whether the run has ended
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Lowercase label for logs and errors
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Researching => "researching",
            Self::Structuring => "structuring",
            Self::Drafting => "drafting",
            Self::Designing => "designing",
            Self::Finalizing => "finalizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for GenerationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Market research for a keyword
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketResearch {
    pub pain_points: Vec<String>,
    pub solutions: Vec<String>,
    pub offer: OfferFramework,
}

/// Value-equation framing of the offer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferFramework {
    pub dream_outcome: String,
    pub perceived_likelihood: String,
    pub time_delay: String,
    pub effort_sacrifice: String,
}

/// Title and chapter outline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TitleOutline {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub target_audience: Option<String>,
    pub cover_image_prompt: Option<String>,
    pub sections: Vec<OutlineSection>,
}

/// One planned chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSection {
    pub title: String,
    /// Talking points for the chapter
    pub bullets: Vec<String>,
}

/// Generated commercial add-ons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedOffer {
    pub bonuses: Vec<Bonus>,
    pub workbook: Workbook,
    pub oto: Oto,
}

/// Source of generated content
///
/// Implementations wrap whatever service produces the text and images.
/// `Sync` is required because chapters are drafted from several threads.
pub trait ContentGenerator: Sync {
    /// Research pain points and the offer for a keyword
    fn research(&self, keyword: &str) -> std::result::Result<MarketResearch, GeneratorError>;

    /// Pick a title and plan the chapters
    fn outline(
        &self,
        keyword: &str,
        research: &MarketResearch,
    ) -> std::result::Result<TitleOutline, GeneratorError>;

    /// Draft one chapter body in light markup
    fn write_chapter(
        &self,
        book_title: &str,
        section: &OutlineSection,
        index: usize,
    ) -> std::result::Result<String, GeneratorError>;

    /// Produce a cover image from a prompt
    fn cover_image(&self, prompt: &str) -> std::result::Result<CoverImage, GeneratorError>;

    /// Produce the value stack for the finished title
    fn value_stack(
        &self,
        title: &str,
        keyword: &str,
    ) -> std::result::Result<GeneratedOffer, GeneratorError>;
}

type Observer<'a> = Box<dyn FnMut(GenerationPhase) + 'a>;

/// Drives a [`ContentGenerator`] through one generation run
pub struct Pipeline<'a, G: ContentGenerator> {
    generator: &'a G,
    phase: GenerationPhase,
    observer: Option<Observer<'a>>,
}

impl<'a, G: ContentGenerator> Pipeline<'a, G> {
    /// Create an idle pipeline
    pub fn new(generator: &'a G) -> Self {
        Self {
            generator,
            phase: GenerationPhase::Idle,
            observer: None,
        }
    }

    /// Register a callback invoked on every phase change
    pub fn with_observer(mut self, observer: impl FnMut(GenerationPhase) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current phase
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Run the whole sequence for a keyword, stamping the asset with the current time
    pub fn run(&mut self, keyword: &str) -> Result<AssetPackage> {
        self.run_at(keyword, Utc::now())
    }

    /// Run the whole sequence for a keyword with an explicit run start
    pub fn run_at(&mut self, keyword: &str, run_start: DateTime<Utc>) -> Result<AssetPackage> {
        let generator = self.generator;
        self.step(StepResult::Done);

        let research = self.required(generator.research(keyword))?;
        log::debug!("Research found {} pain points", research.pain_points.len());
        self.step(StepResult::Done);

        let outline = self.required(generator.outline(keyword, &research))?;
        let title = outline
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| crate::ingest::DEFAULT_TITLE.to_string());
        log::debug!("Outline '{}' with {} sections", title, outline.sections.len());
        self.step(StepResult::Done);

        let chapters = self.draft_chapters(&title, &outline.sections);
        self.step(StepResult::Done);

        let prompt = outline
            .cover_image_prompt
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_cover_prompt(&title, keyword));
        let cover = match generator.cover_image(&prompt) {
            Ok(cover) => Some(cover),
            Err(e) => {
                log::warn!("Cover generation failed, continuing without image: {}", e);
                None
            }
        };
        self.step(StepResult::Done);

        let value_stack = match generator.value_stack(&title, keyword) {
            Ok(offer) => Some(GeneratedValueStack {
                bonuses: Some(offer.bonuses),
                workbook: Some(offer.workbook),
                oto: Some(offer.oto),
            }),
            Err(e) => {
                log::warn!("Value stack generation failed, using default: {}", e);
                None
            }
        };

        let dream_outcome = research.offer.dream_outcome.clone();
        let generated = GeneratedAsset {
            id: None,
            keyword: Some(keyword.to_string()),
            title: outline.title,
            subtitle: outline.subtitle,
            target_audience: outline.target_audience,
            pain_points: Some(research.pain_points),
            dream_outcome: Some(dream_outcome),
            cover_image_base64: cover.map(|c| c.as_data_uri().to_string()),
            cover_image_prompt: Some(prompt),
            chapters: Some(chapters),
            value_stack,
            created_at: Some(run_start),
        };
        let asset = generated.into_package(run_start);
        self.step(StepResult::Done);

        Ok(asset)
    }

    fn draft_chapters(&self, title: &str, sections: &[OutlineSection]) -> Vec<GeneratedChapter> {
        let generator = self.generator;

        let mut drafts: Vec<(usize, Option<String>)> = std::thread::scope(|scope| {
            let handles: Vec<_> = sections
                .iter()
                .enumerate()
                .map(|(index, section)| {
                    let handle =
                        scope.spawn(move || generator.write_chapter(title, section, index));
                    (index, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(index, handle)| {
                    let content = match handle.join() {
                        Ok(Ok(content)) => Some(content),
                        Ok(Err(e)) => {
                            log::warn!("Chapter {} failed: {}", index + 1, e);
                            None
                        }
                        Err(_) => {
                            log::warn!("Chapter {} worker panicked", index + 1);
                            None
                        }
                    };
                    (index, content)
                })
                .collect()
        });

        drafts.sort_by_key(|(index, _)| *index);

        drafts
            .into_iter()
            .map(|(index, content)| GeneratedChapter {
                title: Some(sections[index].title.clone()),
                content,
            })
            .collect()
    }

    fn required<T>(&mut self, result: std::result::Result<T, GeneratorError>) -> Result<T> {
        result.map_err(|source| {
            let phase = self.phase.label();
            log::warn!("Generation failed during {}: {}", phase, source);
            self.step(StepResult::Failed);
            CoreError::Generation { phase, source }
        })
    }

    fn step(&mut self, result: StepResult) {
        let next = self.phase.advance(result);
        if next != self.phase {
            log::debug!("Phase {} -> {}", self.phase, next);
            self.phase = next;
            if let Some(observer) = self.observer.as_mut() {
                observer(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use GenerationPhase::*;

    #[test]
    fn test_advance_happy_path() {
        let mut phase = Idle;
        let mut seen = vec![phase];
        while !phase.is_terminal() {
            phase = phase.advance(StepResult::Done);
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                Idle,
                Researching,
                Structuring,
                Drafting,
                Designing,
                Finalizing,
                Completed
            ]
        );
    }

    #[test]
    fn test_advance_failure_from_any_active_phase() {
        for phase in [Idle, Researching, Structuring, Drafting, Designing, Finalizing] {
            assert_eq!(phase.advance(StepResult::Failed), Failed);
        }
    }

    #[test]
    fn test_terminal_phases_absorb() {
        assert_eq!(Completed.advance(StepResult::Failed), Completed);
        assert_eq!(Failed.advance(StepResult::Done), Failed);
    }

    #[test]
    fn test_phase_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Drafting).unwrap(), "\"DRAFTING\"");
    }
}
