//! Block Kit view builders for the modals and the home tab.

use std::collections::BTreeSet;

use serde_json::{Value, json};

use skilldex_types::skill::{Skill, SkillId};

use crate::http::payload::{DECLARE_CALLBACK_ID, FIND_CALLBACK_ID};

fn plain_text(text: &str) -> Value {
    json!({ "type": "plain_text", "text": text })
}

fn skill_option(name: &str) -> Value {
    json!({ "text": plain_text(name), "value": name })
}

/// The declare-skills modal: a multi-select seeded with every known
/// skill (the member's current skills pre-selected) plus a free-text
/// input for new, comma-separated names.
///
/// The select block is omitted entirely when no skills exist yet --
/// the platform rejects a select element with zero options.
pub fn declare_modal(all_skills: &[Skill], held: &BTreeSet<SkillId>) -> Value {
    let mut blocks = Vec::new();

    if !all_skills.is_empty() {
        let options: Vec<Value> = all_skills
            .iter()
            .map(|skill| skill_option(&skill.name))
            .collect();
        let initial_options: Vec<Value> = all_skills
            .iter()
            .filter(|skill| held.contains(&skill.id))
            .map(|skill| skill_option(&skill.name))
            .collect();

        let mut element = json!({
            "type": "multi_static_select",
            "action_id": "skills_select",
            "placeholder": plain_text("Select or add skills"),
            "options": options,
        });
        if !initial_options.is_empty() {
            element["initial_options"] = Value::Array(initial_options);
        }

        blocks.push(json!({
            "type": "input",
            "block_id": "skills_input",
            "element": element,
            "optional": true,
            "label": plain_text("Skills"),
        }));
    }

    blocks.push(json!({
        "type": "input",
        "block_id": "new_skill_input",
        "element": {
            "type": "plain_text_input",
            "action_id": "new_skill_input",
            "placeholder": plain_text("Enter a new skill"),
        },
        "optional": true,
        "label": plain_text("New Skill"),
    }));

    json!({
        "type": "modal",
        "callback_id": DECLARE_CALLBACK_ID,
        "title": plain_text("Add Skills"),
        "submit": plain_text("Submit"),
        "blocks": blocks,
    })
}

/// The find-skills modal: a single select over every known skill.
pub fn find_modal(all_skills: &[Skill]) -> Value {
    let options: Vec<Value> = all_skills
        .iter()
        .map(|skill| skill_option(&skill.name))
        .collect();

    json!({
        "type": "modal",
        "callback_id": FIND_CALLBACK_ID,
        "title": plain_text("Find Skills"),
        "submit": plain_text("Submit"),
        "blocks": [{
            "type": "input",
            "block_id": "skills_input",
            "element": {
                "type": "static_select",
                "action_id": "skills_select",
                "placeholder": plain_text("Select a skill"),
                "options": options,
            },
            "label": plain_text("Skill"),
        }],
    })
}

/// The app home tab.
pub fn home_view() -> Value {
    json!({
        "type": "home",
        "blocks": [{
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "Welcome to Skilldex! Use `/add-skills` to declare what you know and `/find-skills` to see who can help.",
            },
        }],
    })
}
