//! Property-based tests for the content and plan models
//!
//! Covers the tree invariants the planner and exporters rely on: flattening
//! order, topic weights and chunk continuation merging.

use proptest::prelude::*;

use crate::{Chapter, ContentBlock, ContentKind, ContentModel, Subtopic, Topic};

prop_compose! {
    fn arb_content_block()(
        kind in prop_oneof![
            Just(ContentKind::Paragraph),
            Just(ContentKind::Activity),
            Just(ContentKind::Image),
            Just(ContentKind::Table),
            Just(ContentKind::Question),
        ],
        title_or_caption in "[A-Za-z ]{0,20}",
        text in "[A-Za-z0-9 .,]{0,120}"
    ) -> ContentBlock {
        ContentBlock { kind, title_or_caption, text }
    }
}

prop_compose! {
    fn arb_subtopic()(
        name in "[A-Z][a-z]{2,15}",
        content in prop::collection::vec(arb_content_block(), 0..4)
    ) -> Subtopic {
        Subtopic::new(name, content)
    }
}

prop_compose! {
    fn arb_topic()(
        name in "[A-Z][a-z]{2,15}( [a-z]{2,10})?",
        subtopics in prop::collection::vec(arb_subtopic(), 0..4)
    ) -> Topic {
        Topic::new(name, subtopics)
    }
}

prop_compose! {
    fn arb_chapter()(
        number in proptest::option::of("[1-9][0-9]?"),
        name in "[A-Z][a-z]{3,20}",
        topics in prop::collection::vec(arb_topic(), 0..6)
    ) -> Chapter {
        Chapter { number, name, topics }
    }
}

prop_compose! {
    fn arb_content_model()(
        chapters in prop::collection::vec(arb_chapter(), 0..5)
    ) -> ContentModel {
        ContentModel::new(chapters)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn property_flattening_preserves_chapter_then_topic_order(model in arb_content_model()) {
        let flattened: Vec<(usize, usize)> = model
            .flattened_topics()
            .map(|(c, t, _, _)| (c, t))
            .collect();

        prop_assert_eq!(flattened.len(), model.topic_count());

        let mut sorted = flattened.clone();
        sorted.sort();
        prop_assert_eq!(&flattened, &sorted);

        for (chapter_index, topic_index) in flattened {
            prop_assert!(topic_index < model.chapters[chapter_index].topics.len());
        }
    }

    #[test]
    fn property_topic_weight_counts_content_characters(topic in arb_topic()) {
        let expected: usize = topic
            .subtopics
            .iter()
            .flat_map(|s| &s.content)
            .map(|b| b.text.chars().count())
            .sum();
        prop_assert_eq!(topic.estimated_weight, expected);
    }

    #[test]
    fn property_push_topic_never_loses_subtopics(
        topics in prop::collection::vec(arb_topic(), 0..8)
    ) {
        let mut chapter = Chapter::new(None, "Sound");
        let expected_subtopics: usize = topics.iter().map(|t| t.subtopics.len()).sum();
        let expected_weight: usize = topics.iter().map(|t| t.estimated_weight).sum();

        for topic in topics {
            chapter.push_topic(topic);
        }

        let subtopics: usize = chapter.topics.iter().map(|t| t.subtopics.len()).sum();
        let weight: usize = chapter.topics.iter().map(|t| t.estimated_weight).sum();
        prop_assert_eq!(subtopics, expected_subtopics);
        prop_assert_eq!(weight, expected_weight);

        for pair in chapter.topics.windows(2) {
            prop_assert_ne!(&pair[0].name, &pair[1].name);
        }
    }
}
