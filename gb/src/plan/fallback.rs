//! Offline fallback plans
//!
//! Deterministic, goal-aware canned plans used when no model is configured,
//! every model in the chain failed, or a model returned a malformed payload.
//! Pure functions: same input, same output, no I/O.

use tracing::debug;

use crate::domain::{Complexity, GoalPlan, Language, STEP_COUNT, SubStepPlan};

/// Keyword family a goal falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTemplate {
    /// "launch" / "deploy"
    Launch,
    /// "research" / "analyze"
    Research,
    /// Anything else
    General,
}

impl PlanTemplate {
    /// Pick the template for a goal by scanning its lowercased text
    pub fn for_goal(goal: &str) -> Self {
        let lowered = goal.to_lowercase();
        let template = if lowered.contains("launch") || lowered.contains("deploy") {
            Self::Launch
        } else if lowered.contains("research") || lowered.contains("analyze") {
            Self::Research
        } else {
            Self::General
        };
        debug!(?template, "PlanTemplate::for_goal: selected");
        template
    }

    fn steps(&self, language: Language) -> [&'static str; STEP_COUNT] {
        match (self, language) {
            (Self::Launch, Language::En) => [
                "Audit launch prerequisites, key dependencies, and regulatory blockers.",
                "Build and validate an execution playbook with timeline gates.",
                "Stage infrastructure and rehearsal environments for dry runs.",
                "Run limited-scope launch rehearsal capturing telemetry and gaps.",
                "Green-light full launch with war-room monitoring and postmortem plan.",
            ],
            (Self::Launch, Language::Am) => [
                "የማስጀመሪያ ቅድመ ሁኔታዎችን፣ ቁልፍ ጥገኞችን እና የቁጥጥር እንቅፋቶችን ይገምግሙ።",
                "የጊዜ ሰሌዳ መቆጣጠሪያዎች ያሉት የአፈጻጸም መመሪያ ይገንቡ እና ያረጋግጡ።",
                "ለሙከራ ሩጫዎች መሠረተ ልማትን እና የልምምድ አካባቢዎችን ያዘጋጁ።",
                "ቴሌሜትሪ እና ክፍተቶችን በመመዝገብ የተወሰነ ወሰን ያለው የማስጀመሪያ ልምምድ ያካሂዱ።",
                "በቁጥጥር ክፍል ክትትል እና የድህረ-ክስተት ግምገማ እቅድ ሙሉ ማስጀመሪያውን ይፍቀዱ።",
            ],
            (Self::Research, Language::En) => [
                "Define research hypotheses, success metrics, and scope boundaries.",
                "Collect and normalize critical datasets or expert interviews.",
                "Synthesize findings into structured frameworks and models.",
                "Pressure-test insights with stakeholders for blind spots.",
                "Publish decision-ready brief with recommended actions.",
            ],
            (Self::Research, Language::Am) => [
                "የምርምር መላምቶችን፣ የስኬት መለኪያዎችን እና የወሰን ድንበሮችን ይግለጹ።",
                "ወሳኝ የመረጃ ስብስቦችን ወይም የባለሙያ ቃለ-መጠይቆችን ይሰብስቡ እና ያደራጁ።",
                "ግኝቶችን ወደ የተዋቀሩ ማዕቀፎች እና ሞዴሎች ያዋህዱ።",
                "ግንዛቤዎችን ከባለድርሻ አካላት ጋር ለተደበቁ ክፍተቶች ይፈትሹ።",
                "ለውሳኔ ዝግጁ የሆነ ማጠቃለያ ከሚመከሩ እርምጃዎች ጋር ያትሙ።",
            ],
            (Self::General, Language::En) => [
                "Define scope, success metrics, and constraints for the goal.",
                "Map critical resources, tools, and personnel needed.",
                "Develop a sequenced execution playbook with owners.",
                "Instrument telemetry to monitor progress in real-time.",
                "Run post-action review and iterate on next objectives.",
            ],
            (Self::General, Language::Am) => [
                "ለግቡ ወሰን፣ የስኬት መለኪያዎችን እና ገደቦችን ይግለጹ።",
                "የሚያስፈልጉ ወሳኝ ሀብቶችን፣ መሣሪያዎችን እና ሰራተኞችን ይለዩ።",
                "ባለቤቶች የተመደቡበት ቅደም ተከተል ያለው የአፈጻጸም መመሪያ ያዘጋጁ።",
                "ሂደቱን በቅጽበት ለመከታተል ቴሌሜትሪ ይጫኑ።",
                "ከእርምጃ በኋላ ግምገማ ያካሂዱ እና በቀጣይ ዓላማዎች ላይ ይድገሙ።",
            ],
        }
    }

    /// Render this template as a plan (complexity 5)
    pub fn plan(&self, language: Language) -> GoalPlan {
        GoalPlan::from_template(self.steps(language), Complexity::moderate())
    }
}

/// Offline five-step plan for a goal
pub fn offline_plan(goal: &str, language: Language) -> GoalPlan {
    debug!(goal_len = goal.len(), %language, "offline_plan: called");
    PlanTemplate::for_goal(goal).plan(language)
}

/// Offline three-item sub-plan; the step text does not influence the result
pub fn offline_sub_plan(step: &str, language: Language) -> SubStepPlan {
    debug!(step_len = step.len(), %language, "offline_sub_plan: called");
    let substeps: [&str; 3] = match language {
        Language::En => ["Initialize subsystem.", "Execute protocol.", "Verify status."],
        Language::Am => ["ንዑስ ስርዓቱን ያስጀምሩ።", "ፕሮቶኮሉን ያስፈጽሙ።", "ሁኔታውን ያረጋግጡ።"],
    };
    SubStepPlan::new(substeps.iter().map(|s| s.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_selection() {
        assert_eq!(PlanTemplate::for_goal("Launch the new product"), PlanTemplate::Launch);
        assert_eq!(PlanTemplate::for_goal("DEPLOY to prod"), PlanTemplate::Launch);
        assert_eq!(PlanTemplate::for_goal("Research competitors"), PlanTemplate::Research);
        assert_eq!(PlanTemplate::for_goal("analyze churn"), PlanTemplate::Research);
        assert_eq!(PlanTemplate::for_goal("Learn to cook"), PlanTemplate::General);
    }

    #[test]
    fn test_launch_wins_over_research() {
        assert_eq!(
            PlanTemplate::for_goal("Research and launch a product"),
            PlanTemplate::Launch
        );
    }

    #[test]
    fn test_offline_plan_launch_template() {
        let plan = offline_plan("Launch the new product", Language::En);
        assert_eq!(plan.complexity.get(), 5);
        assert_eq!(
            plan.steps[0],
            "Audit launch prerequisites, key dependencies, and regulatory blockers."
        );
        assert_eq!(plan, offline_plan("Launch the new product", Language::En));
    }

    #[test]
    fn test_offline_plan_translated() {
        let en = offline_plan("Research the market", Language::En);
        let am = offline_plan("Research the market", Language::Am);
        assert_ne!(en.steps, am.steps);
        assert_eq!(am.complexity.get(), 5);
        assert!(am.steps.iter().all(|s| !s.trim().is_empty()));
    }

    #[test]
    fn test_offline_sub_plan() {
        let en = offline_sub_plan("anything", Language::En);
        assert_eq!(
            en.substeps(),
            &["Initialize subsystem.", "Execute protocol.", "Verify status."]
        );
        let am = offline_sub_plan("anything", Language::Am);
        assert_eq!(am.substeps().len(), 3);
        assert_ne!(am, en);
    }
}
