use crate::attribute::{expand, is_attribute_question};
use crate::detail::{is_detail_request, reference_index, select_url};
use crate::{ReferenceResolver, Resolution, ResolutionKind};
use vera_core::{Listing, Turn};
use vera_session::ConversationState;

const U1: &str = "https://bienesadjudicadoscr.com/propiedades/terreno-moravia-1";
const U2: &str = "https://bienesadjudicadoscr.com/propiedades/casa-escazu-2";
const U3: &str = "https://bienesadjudicadoscr.com/propiedades/lote-guanacaste-3";

fn resolver() -> ReferenceResolver {
    ReferenceResolver::new("bienesadjudicadoscr.com")
}

fn results_turn() -> Turn {
    Turn::assistant(format!(
        "**Resultados:**\n\n\
         1. **Terreno en Moravia** | USD 450,000 | [Ver en web]({U1})\n\
         2. **Casa en Escazú** | USD 380,000 | [Ver en web]({U2})\n\
         3. **Lote en Guanacaste** | USD 200,000 | [Ver en web]({U3})"
    ))
}

fn empty_state() -> ConversationState {
    ConversationState::new()
}

// ========== Detail request detection ==========

#[test]
fn test_detects_detail_phrases() {
    assert!(is_detail_request("dime más sobre la primera"));
    assert!(is_detail_request("dame info de esa casa"));
    assert!(is_detail_request("quiero ver detalles"));
    assert!(is_detail_request("info de #2"));
    assert!(is_detail_request("profundiza en eso"));
}

#[test]
fn test_ignores_fresh_searches() {
    assert!(!is_detail_request("casas en Alajuela bajo 150000"));
    assert!(!is_detail_request("terrenos en Guanacaste hasta 200 mil"));
    assert!(!is_detail_request("hola buenas tardes"));
}

// ========== Reference index ==========

#[test]
fn test_hash_reference_wins() {
    assert_eq!(reference_index("la primera, digo #3"), Some(3));
}

#[test]
fn test_spelled_ordinals() {
    assert_eq!(reference_index("dime más de la segunda"), Some(2));
    assert_eq!(reference_index("detalles del tercero"), Some(3));
    assert_eq!(reference_index("la sexta opción"), Some(6));
}

#[test]
fn test_article_number() {
    assert_eq!(reference_index("muestrame la 2"), Some(2));
    assert_eq!(reference_index("el número 4"), Some(4));
}

#[test]
fn test_no_reference() {
    assert_eq!(reference_index("dame más información"), None);
}

// ========== URL selection ==========

#[test]
fn test_select_defaults_to_most_recent() {
    let urls = vec![U1.to_string(), U2.to_string()];
    assert_eq!(select_url(&urls, None), Some(U1));
}

#[test]
fn test_select_by_number() {
    let urls = vec![U1.to_string(), U2.to_string(), U3.to_string()];
    assert_eq!(select_url(&urls, Some(2)), Some(U2));
}

#[test]
fn test_select_out_of_range_is_none() {
    let urls = vec![U1.to_string()];
    assert_eq!(select_url(&urls, Some(5)), None);
    assert_eq!(select_url(&urls, Some(0)), None);
}

#[test]
fn test_select_empty() {
    assert_eq!(select_url(&[], None), None);
}

// ========== Resolution: detail rewrites ==========

#[test]
fn test_ordinal_resolves_second_url() {
    let r = resolver();
    let resolution = r.resolve(
        "dime más de la segunda",
        &empty_state(),
        &[results_turn()],
    );
    assert_eq!(resolution.kind, ResolutionKind::DetailRewrite);
    assert_eq!(resolution.text, format!("Dame información detallada de {U2}"));
}

#[test]
fn test_default_resolves_most_recent() {
    let r = resolver();
    let resolution = r.resolve("dame más información", &empty_state(), &[results_turn()]);
    assert_eq!(resolution.text, format!("Dame información detallada de {U1}"));
}

#[test]
fn test_out_of_range_passes_through() {
    let r = resolver();
    let resolution = r.resolve("dime más de la #9", &empty_state(), &[results_turn()]);
    assert_eq!(resolution.kind, ResolutionKind::Unchanged);
    assert_eq!(resolution.text, "dime más de la #9");
}

#[test]
fn test_user_urls_are_ignored() {
    let r = resolver();
    let window = vec![Turn::user(format!("mira esto {U3}"))];
    let resolution = r.resolve("dame más información", &empty_state(), &window);
    assert_eq!(resolution.kind, ResolutionKind::Unchanged);
}

#[test]
fn test_urls_deduplicated_most_recent_first() {
    let r = resolver();
    let window = vec![
        Turn::assistant(format!("Antes te mostré {U1} y {U2}")),
        Turn::user("ok"),
        Turn::assistant(format!("Ahora mira {U2} y {U3}")),
    ];
    let resolution = r.resolve("la 3", &empty_state(), &window);
    // Recency order: U2, U3, then U1 from the older turn.
    assert_eq!(resolution.text, format!("Dame información detallada de {U1}"));
}

#[test]
fn test_falls_back_to_stored_listings() {
    let r = resolver();
    let mut state = empty_state();
    let mut a = Listing::new(1, "Terreno en Moravia");
    a.source_url = Some(U1.into());
    let mut b = Listing::new(2, "Casa en Escazú");
    b.source_url = Some(U2.into());
    state.set_search_results(vec![a, b]);

    let resolution = r.resolve("cuéntame más de la primera", &state, &[]);
    assert_eq!(resolution.kind, ResolutionKind::DetailRewrite);
    assert_eq!(resolution.text, format!("Dame información detallada de {U1}"));
}

#[test]
fn test_foreign_domain_urls_not_harvested() {
    let r = resolver();
    let window = vec![Turn::assistant(
        "mira https://otra-inmobiliaria.com/propiedades/x-99".to_string(),
    )];
    let resolution = r.resolve("dame más información", &empty_state(), &window);
    assert_eq!(resolution.kind, ResolutionKind::Unchanged);
}

#[test]
fn test_resolve_is_idempotent() {
    let r = resolver();
    let state = empty_state();
    let window = vec![results_turn()];
    let first = r.resolve("dime más de la segunda", &state, &window);
    let second = r.resolve("dime más de la segunda", &state, &window);
    assert_eq!(first, second);
}

// ========== Resolution: attribute expansion ==========

fn property() -> Listing {
    let mut l = Listing::new(7, "Casa en El Carmen");
    l.source_url = Some("https://bienesadjudicadoscr.com/propiedades/casa-carmen-7".into());
    l
}

#[test]
fn test_attribute_detection() {
    assert!(is_attribute_question("¿a qué banco pertenece?"));
    assert!(is_attribute_question("quien es el agente"));
    assert!(is_attribute_question("cuantos cuartos tiene"));
    assert!(is_attribute_question("¿dónde está ubicada?"));
    assert!(!is_attribute_question("busca casas en San José"));
}

#[test]
fn test_attribute_expansion_includes_name_and_url() {
    let expanded = expand("a que banco pertenece?", Some(&property())).expect("expanded");
    assert!(expanded.starts_with("a que banco pertenece?"));
    assert!(expanded.contains("Casa en El Carmen"));
    assert!(expanded.contains("casa-carmen-7"));
}

#[test]
fn test_attribute_without_property_is_none() {
    assert_eq!(expand("a que banco pertenece?", None), None);
}

#[test]
fn test_attribute_expansion_through_resolver() {
    let r = resolver();
    let mut state = empty_state();
    state.set_last_property(property());
    let resolution = r.resolve("¿a qué banco pertenece?", &state, &[]);
    assert_eq!(resolution.kind, ResolutionKind::AttributeExpansion);
    assert!(resolution.text.contains("Casa en El Carmen"));
}

#[test]
fn test_detail_rewrite_takes_precedence() {
    let r = resolver();
    let mut state = empty_state();
    state.set_last_property(property());
    // Both a detail cue ("la primera") and an attribute cue ("tiene ...").
    let resolution = r.resolve("tiene garage la primera?", &state, &[results_turn()]);
    assert_eq!(resolution.kind, ResolutionKind::DetailRewrite);
    assert_eq!(resolution.text, format!("Dame información detallada de {U1}"));
}

#[test]
fn test_plain_message_passes_through() {
    let r = resolver();
    let resolution = r.resolve("hola buenas", &empty_state(), &[]);
    assert_eq!(
        resolution,
        Resolution { text: "hola buenas".into(), kind: ResolutionKind::Unchanged }
    );
}
