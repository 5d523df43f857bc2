use anyhow::{anyhow, Result};
use async_trait::async_trait;
use pirjo_agent::{
    write_from_json, AcademicWriter, CitationReviewer, CoherenceManager, Methodologist,
    ScientificWriter, SourceAnalyst,
};
use pirjo_core::llm::{Message, ModelProvider};
use pirjo_core::{Fragment, PirjoBlocks};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays scripted replies and records every request.
#[derive(Default)]
struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    fn with_replies(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            requests: Mutex::default(),
        })
    }

    fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    fn prompt(&self, i: usize) -> String {
        self.requests()[i].last().unwrap().content.clone()
    }

    fn system(&self, i: usize) -> String {
        self.requests()[i][0].content.clone()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        self.requests.lock().unwrap().push(messages.to_vec());
        Ok(self.replies.lock().unwrap().pop_front().unwrap_or_default())
    }
}

struct FailingProvider;

#[async_trait]
impl ModelProvider for FailingProvider {
    async fn chat(&self, _messages: &[Message]) -> Result<String> {
        Err(anyhow!("connection refused"))
    }
}

fn blocks() -> PirjoBlocks {
    PirjoBlocks {
        problem: "p".to_string(),
        information: "i".to_string(),
        restriction: "r".to_string(),
        justification: "j".to_string(),
        objective: "o".to_string(),
    }
}

#[tokio::test]
async fn test_analyst_prompt_carries_inputs_and_citations() {
    let provider = ScriptedProvider::with_replies(&["  - dato [a.pdf:1:1]  "]);
    let analyst = SourceAnalyst::new(provider.clone(), 12_000);
    let fragments = vec![Fragment {
        file: "a.pdf".to_string(),
        page: 1,
        chunk: 1,
        text: "El agua hierve a 100 grados.".to_string(),
    }];

    let bullets = analyst
        .analyze("Título X", "Objetivo Y", "Resumen Z", &fragments)
        .await
        .unwrap();

    assert_eq!(bullets, "- dato [a.pdf:1:1]");
    let prompt = provider.prompt(0);
    assert!(prompt.starts_with("Título de investigación: Título X\nObjetivo: Objetivo Y\nResumen: Resumen Z"));
    assert!(prompt.ends_with("[a.pdf:1:1]\nEl agua hierve a 100 grados.\n\n"));
    assert_eq!(provider.system(0), "Agente Analista de Fuentes");
}

#[tokio::test]
async fn test_methodologist_issues_five_calls() {
    let provider = ScriptedProvider::with_replies(&[
        r#"{"P": "problema [a.pdf:1:1]"}"#,
        "```json\n{\"I\": \"info\"}\n```",
        "no es json",
        r#"{"J": {"a": "jus", "b": "tificación"}}"#,
        r#"{"X": "otra clave"}"#,
    ]);
    let blocks = Methodologist::new(provider.clone())
        .build_blocks("- viñeta [a.pdf:1:1]")
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 5);
    for (i, letter) in ["P", "I", "R", "J", "O"].iter().enumerate() {
        let prompt = provider.prompt(i);
        assert!(prompt.contains(&format!("bloque {letter} (")));
        assert!(prompt.contains("Mantén las citas entre corchetes exactamente como aparecen."));
        assert!(prompt.contains("- viñeta [a.pdf:1:1]"));
    }
    let systems: std::collections::HashSet<_> = (0..5).map(|i| provider.system(i)).collect();
    assert_eq!(systems.len(), 5);

    assert_eq!(blocks.problem, "problema [a.pdf:1:1]");
    assert_eq!(blocks.information, "info");
    assert_eq!(blocks.restriction, "no es json");
    assert_eq!(blocks.justification, "jus tificación");
    assert_eq!(blocks.objective, r#"{"X": "otra clave"}"#);
}

#[tokio::test]
async fn test_manager_prompt_mentions_title_and_objective() {
    let provider = ScriptedProvider::with_replies(&[
        r#"{"P": "P2", "I": "I2", "R": "R2", "J": "J2", "O": "O2"}"#,
    ]);
    let revised = CoherenceManager::new(provider.clone())
        .review("Título", "Objetivo", blocks())
        .await
        .unwrap();

    let prompt = provider.prompt(0);
    assert!(prompt.contains("Título"));
    assert!(prompt.contains("Objetivo"));
    assert!(prompt.contains(r#""P":"p""#));
    assert_eq!(revised.objective, "O2");
}

#[tokio::test]
async fn test_manager_keeps_blocks_on_bad_reply() {
    for reply in ["no json", r#"{"P": "solo una"}"#] {
        let provider = ScriptedProvider::with_replies(&[reply]);
        let revised = CoherenceManager::new(provider)
            .review("T", "O", blocks())
            .await
            .unwrap();
        assert_eq!(revised, blocks());
    }
}

#[tokio::test]
async fn test_writer_prompt_constraints() {
    let provider = ScriptedProvider::with_replies(&["Introducción"]);
    let text = AcademicWriter::new(provider.clone())
        .write(&blocks())
        .await
        .unwrap();

    assert_eq!(text, "Introducción");
    let prompt = provider.prompt(0);
    assert!(prompt.contains("cinco párrafos"));
    assert!(prompt.contains("orden inalterable"));
    assert!(prompt.contains("entre 500 y 700 palabras"));
    assert!(prompt.ends_with(&blocks().to_json()));
}

#[tokio::test]
async fn test_reviewer_prompt_mentions_apa() {
    let provider = ScriptedProvider::with_replies(&[""]);
    CitationReviewer::new(provider.clone())
        .review("texto")
        .await
        .unwrap();

    let prompt = provider.prompt(0);
    assert!(prompt.contains("APA 7"));
    assert!(prompt.contains("Referencias"));
    assert!(prompt.ends_with("Texto:\ntexto"));
}

#[tokio::test]
async fn test_scientific_writer_prompt_is_coherent() {
    let provider = ScriptedProvider::with_replies(&[""]);
    ScientificWriter::new(provider.clone())
        .write(&blocks())
        .await
        .unwrap();

    assert!(provider.prompt(0).contains("texto coherente"));
    assert!(provider.system(0).contains("experto redactor"));
}

#[tokio::test]
async fn test_write_from_json_uses_merged_blocks() {
    let provider = ScriptedProvider::with_replies(&["texto"]);
    let raw = json!({"P": "a", "P2": "b", "O": "c"});

    let result = write_from_json(provider.clone(), &raw).await.unwrap();

    assert_eq!(result, "texto");
    assert!(provider
        .prompt(0)
        .contains(r#"{"P":"a b","I":"","R":"","J":"","O":"c"}"#));
}

#[tokio::test]
async fn test_transport_errors_propagate() {
    let provider: Arc<dyn ModelProvider> = Arc::new(FailingProvider);
    assert!(Methodologist::new(provider.clone())
        .build_blocks("x")
        .await
        .is_err());
    assert!(CoherenceManager::new(provider)
        .review("T", "O", blocks())
        .await
        .is_err());
}
