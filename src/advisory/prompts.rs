//! Fixed prompt templates for the advisory calls. Responses are requested
//! in Portuguese, matching the app's audience.

/// Classification-code suggestions and customs-risk notes for one product.
pub fn classification_prompt(product_name: &str) -> String {
    format!(
        "Analise o produto \"{product_name}\" para exportação/importação. \
         Sugira 3 códigos NCM prováveis e uma breve explicação de riscos \
         alfandegários. Responda em português, texto curto."
    )
}

/// One-sentence gap analysis over the documents attached so far.
pub fn document_summary_prompt(doc_names: &[String]) -> String {
    format!(
        "Eu tenho os seguintes documentos para um processo de exportação: {}. \
         O que está faltando para um processo padrão? Responda em 1 frase.",
        doc_names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prompt_embeds_product() {
        let prompt = classification_prompt("Café Torrado");
        assert!(prompt.contains("\"Café Torrado\""));
        assert!(prompt.contains("NCM"));
    }

    #[test]
    fn summary_prompt_joins_names() {
        let prompt = document_summary_prompt(&[
            "Commercial Invoice".to_string(),
            "Packing List".to_string(),
        ]);
        assert!(prompt.contains("Commercial Invoice, Packing List"));
    }
}
