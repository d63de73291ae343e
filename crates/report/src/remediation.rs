//! Remediation hints keyed by rule id

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Bullet used for rules without specific guidance
pub const GENERIC_RECOMMENDATION: &str =
    "Consulte a documentação específica para obter orientações sobre como corrigir esta violação.";

static RECOMMENDATIONS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        (
            "image-alt",
            vec![
                "Adicione um atributo alt descritivo a todas as imagens.",
                "Use alt=\"\" para imagens decorativas.",
                "Certifique-se de que o texto alternativo transmita o mesmo significado e função da imagem.",
            ],
        ),
        (
            "color-contrast",
            vec![
                "Aumente o contraste entre o texto e o fundo.",
                "Use uma ferramenta de verificação de contraste para garantir uma relação de contraste mínima de 4.5:1 para texto normal e 3:1 para texto grande.",
                "Considere oferecer um modo de alto contraste.",
            ],
        ),
        (
            "html-has-lang",
            vec![
                "Adicione o atributo lang ao elemento <html>, por exemplo lang=\"pt-BR\".",
                "Use um código de idioma válido (BCP 47) que corresponda ao conteúdo principal.",
            ],
        ),
        (
            "label",
            vec![
                "Associe cada campo de formulário a um <label> usando o atributo for.",
                "Quando um rótulo visível não for possível, use aria-label ou aria-labelledby.",
            ],
        ),
        (
            "link-name",
            vec![
                "Garanta que todo link tenha texto visível que descreva seu destino.",
                "Para links compostos apenas por ícones, forneça aria-label.",
            ],
        ),
        (
            "landmark-one-main",
            vec!["Envolva o conteúdo principal da página em um único elemento <main>."],
        ),
        (
            "page-has-heading-one",
            vec!["Adicione um único <h1> que descreva o propósito da página."],
        ),
        (
            "region",
            vec![
                "Coloque todo o conteúdo dentro de landmarks como <header>, <nav>, <main> e <footer>.",
            ],
        ),
        (
            "meta-viewport",
            vec![
                "Remova maximum-scale e user-scalable=no da tag <meta name=\"viewport\">.",
            ],
        ),
    ])
});

/// Remediation bullets for `rule_id`, or the single generic bullet
pub fn recommendations(rule_id: &str) -> &'static [&'static str] {
    RECOMMENDATIONS
        .get(rule_id)
        .map(Vec::as_slice)
        .unwrap_or(&[GENERIC_RECOMMENDATION])
}
