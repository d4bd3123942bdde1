//! The deep reasoning chain.
//!
//! A fixed instructional document forcing a multi-step analytical
//! decomposition before any categorical label is emitted. This is
//! human-authored prompt-engineering prose: treat it as versioned
//! configuration data, concatenate it, and never derive it algorithmically.

/// Version marker for the reasoning chain, bumped whenever the wording
/// changes enough to affect output comparability.
pub const REASONING_CHAIN_VERSION: &str = "v3";

/// The deep reasoning chain itself.
pub const REASONING_CHAIN: &str = r#"DEEP REASONING CHAIN - COMPLETE EVERY STEP BEFORE ASSIGNING ANY LABEL

You are analyzing a short-form video. Work through every step below, in order,
writing out your answer to each before moving on. Do not skip steps. Do not
assign a humor type, quality tier, or any other categorical label until the
full chain is complete.

STEP 1 - CHARACTER DYNAMIC
Who appears in the video and what is the relationship between them? Identify
each on-screen (or voiced) persona and how they relate: peer/peer, expert/
novice, authority/subordinate, insider/outsider, self vs. past self. If one
person plays multiple roles, say so explicitly.

STEP 2 - UNDERLYING TENSION
What expectation, norm, or unspoken rule is in play? Every joke resolves some
tension. Name the specific tension here: a social norm at risk of being
broken, a prediction the viewer is invited to make, a status imbalance, an
awkwardness everyone recognizes. "Something unexpected happens" is not a
tension; name what was expected and by whom.

STEP 3 - FORMAT PARTICIPATION
Is this video participating in a recognizable format, trend, or template
(POV, greenscreen rant, day-in-the-life, duet/stitch reply, sound-driven
meme)? If yes, name it and state whether the video plays the format straight,
exaggerates it, or subverts it. If no, say "no identifiable format".

STEP 4 - EDITING CONTRIBUTION
What do the cuts, zooms, captions, sound effects, or speed changes contribute?
Identify at least one editing choice and what it does for the comedy: timing a
reveal, undercutting a statement, signaling irony, creating a hard contrast
between consecutive shots. If the editing is genuinely neutral, say so.

STEP 5 - VISUAL PUNCHLINE
Is there a moment where the image itself carries the joke, independent of any
words? Describe exactly what is shown at that moment and why seeing it lands
harder than describing it would. Many videos are funny with the sound off;
decide whether this is one of them.

STEP 6 - TONE AND DELIVERY
Characterize the performer's delivery: deadpan, exaggerated, sincere,
exasperated, mock-serious, chaotic. How does the delivery interact with the
content - does it amplify it, contradict it, or disguise it?

STEP 7 - AUDIENCE SURROGATE
Who inside the video, if anyone, reacts the way the viewer is supposed to: a
bystander's glance, a cutaway reaction, the creator breaking character? If the
viewer is the only witness, note that the video relies on direct complicity.

STEP 8 - WORDPLAY AND MISUNDERSTANDING
Is any of the humor carried by language itself: a pun, a double meaning, an
ambiguous phrase taken the wrong way, a literal reading of a figurative
statement? Quote the exact words involved, or state that no wordplay is
present.

STEP 9 - SOCIAL DYNAMIC
What shared social experience does the video depend on? Group chats, service
jobs, family roles, dating, roommates, school. State the experience and
whether the video's stance toward it is affectionate, critical, or resigned.

STEP 10 - CULTURAL CONTEXT
What does a viewer need to already know for this to land: a meme lineage, a
platform convention, a regional reference, a current event, a sound's history?
If the video is fully self-contained, say so; claiming cultural context that
is not actually required is a common analysis failure.

STEP 11 - CONTENT TYPE
Classify the artifact itself: scripted skit, candid capture, reaction,
commentary, tutorial-shaped comedy, compilation. Note whether its comedic
value depends on appearing unscripted.

STEP 12 - QUALITY TIER
Assign a tier (exceptional / strong / average / weak) and justify it using the
steps above: precision of the setup, economy of the edit, specificity of the
observation. A tier without a justification grounded in the chain is invalid.

STEP 13 - MECHANISM
In one or two sentences, state the comedic mechanism: the specific way this
video converts its tension (Step 2) into a laugh. The mechanism must be
particular enough that it could NOT describe a randomly chosen other video.

STEP 14 - CORE INSIGHT
State the single most important thing a replicator would need to understand
to recreate the effect of this video with different surface content."#;

/// Closing instruction appended after the chain.
const REASONING_CODA: &str = "When you emit the final structured output, every categorical field \
(humor type, content type, quality tier) must agree with what you wrote in the corresponding \
reasoning step above. If a label and a step disagree, redo the step.";

/// Render the reasoning-chain prompt section: the chain plus its coda.
pub fn build_prompt_section() -> String {
    format!("{}\n\n{}", REASONING_CHAIN, REASONING_CODA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_is_chain_plus_coda() {
        let section = build_prompt_section();
        assert!(section.starts_with(REASONING_CHAIN));
        assert!(section.ends_with("redo the step."));
        assert!(!section.is_empty());
    }

    #[test]
    fn test_chain_covers_every_step() {
        for step in 1..=14 {
            assert!(
                REASONING_CHAIN.contains(&format!("STEP {}", step)),
                "missing step {}",
                step
            );
        }
    }
}
