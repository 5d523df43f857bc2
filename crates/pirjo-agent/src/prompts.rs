use pirjo_core::{BlockKey, PirjoBlocks};

pub const ANALYST_SYSTEM: &str = "Agente Analista de Fuentes";
pub const MANAGER_SYSTEM: &str = "Agente Manager de Coherencia";
pub const WRITER_SYSTEM: &str = "Agente Redactor Académico";
pub const REVIEWER_SYSTEM: &str = "Agente Revisor Académico";
pub const SCIENTIFIC_SYSTEM: &str =
    "Eres un experto redactor científico que integra ideas en prosa académica clara.";

pub fn analyst(title: &str, objective: &str, summary: &str, fragments: &str) -> String {
    format!(
        "Título de investigación: {title}\n\
         Objetivo: {objective}\n\
         Resumen: {summary}\n\n\
         A partir de los textos con su cita entre corchetes, extrae conceptos, datos y hallazgos \
         relevantes. Responde en viñetas breves y termina cada viñeta con la cita correspondiente.\
         \n\n{fragments}"
    )
}

/// One system role per block so each request reads as its own specialist.
pub fn methodologist_system(key: BlockKey) -> String {
    format!("Agente Metodólogo PIRJO, bloque {} ({})", key.letter(), key.label())
}

pub fn methodologist(key: BlockKey, bullets: &str) -> String {
    let letter = key.letter();
    format!(
        "Convierte las viñetas siguientes en el bloque {letter} ({}) con 2-3 oraciones claras. \
         Responde estrictamente en JSON con la clave \"{letter}\". \
         Mantén las citas entre corchetes exactamente como aparecen.\n\n\
         Viñetas:\n{bullets}",
        key.label()
    )
}

pub fn manager(title: &str, objective: &str, blocks: &PirjoBlocks) -> String {
    format!(
        "Eres el responsable de la coherencia de una introducción académica.\n\
         Título de investigación: {title}\n\
         Objetivo: {objective}\n\n\
         Revisa que los bloques PIRJO sean coherentes entre sí y con el título y el objetivo. \
         Ajusta la redacción solo cuando sea necesario y mantén las citas entre corchetes. \
         Responde estrictamente en JSON con las claves \"P\", \"I\", \"R\", \"J\" y \"O\".\n\n\
         Bloques:\n{}",
        blocks.to_json()
    )
}

pub fn writer(blocks: &PirjoBlocks) -> String {
    format!(
        "Eres un redactor académico. Con los bloques PIRJO dados en formato JSON, redacta una \
         introducción de cinco párrafos, un párrafo para cada bloque (P, I, R, J y O) y en ese \
         orden inalterable. La extensión total debe estar entre 500 y 700 palabras. \
         Mantén un estilo formal e incluye las citas cuando se proporcionen.\n\n{}",
        blocks.to_json()
    )
}

pub fn reviewer(text: &str) -> String {
    format!(
        "Eres un revisor académico. Verifica que el texto incluya citas en el cuerpo \
         y agrega una sección final titulada \"Referencias\" con las entradas en formato APA 7.\n\n\
         Texto:\n{text}"
    )
}

pub fn scientific(blocks: &PirjoBlocks) -> String {
    format!(
        "Con los bloques PIRJO siguientes en formato JSON, escribe un texto coherente y fluido \
         que los integre en el orden P, I, R, J y O, con registro científico. \
         Conserva las citas entre corchetes tal como aparecen.\n\n{}",
        blocks.to_json()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methodologist_roles_are_distinct() {
        let roles: std::collections::HashSet<_> =
            BlockKey::ALL.into_iter().map(methodologist_system).collect();
        assert_eq!(roles.len(), 5);
    }

    #[test]
    fn test_methodologist_names_block() {
        let prompt = methodologist(BlockKey::R, "- dato [a.pdf:1:1]");
        assert!(prompt.contains("bloque R (Restricción o brecha)"));
        assert!(prompt.contains("clave \"R\""));
        assert!(prompt.ends_with("- dato [a.pdf:1:1]"));
    }
}
