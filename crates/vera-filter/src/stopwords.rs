//! Spanish stop words ignored by the free-text tokenizer.

/// Request verbs, articles, greetings, fillers, and generic property nouns
/// that carry no search signal on their own.
pub const STOPWORDS: &[&str] = &[
    // request verbs
    "buscame", "búscame", "buscar", "busca", "busquen", "busques", "busco",
    "necesito", "ocupo", "quiero", "quisiera", "dame", "ver",
    "mostrame", "muéstrame", "mostrar", "traeme", "tráeme", "traer",
    "ayuda", "ayudame", "ayúdame", "info", "informacion", "información",
    "especificamente", "específicamente", "exactamente", "porfavor",
    // articles, prepositions, connectors
    "en", "de", "del", "la", "el", "los", "las", "un", "una", "unas", "unos",
    "por", "para", "que", "con", "sin", "y", "o", "es", "son",
    "tiene", "tienen", "mas", "más", "menos", "muy", "poco", "mucho",
    "bastante", "cerca", "lejos", "algo", "alguna", "alguno", "algunas", "algunos",
    // greetings and fillers
    "hola", "buenas", "buenos", "dias", "días", "tardes", "noches", "gracias",
    // generic property nouns
    "propiedad", "propiedades", "casa", "casas", "lote", "lotes",
    "terreno", "terrenos", "bien", "bienes", "inmueble", "inmuebles",
    // low-signal adjectives
    "barato", "barata", "caro", "cara", "económico", "economico",
    "lujoso", "pequeño", "pequeno", "grande",
    // state fillers
    "hay", "esta", "está", "estan", "están", "situada", "ubicada", "localizada",
];

pub fn is_stop_word(token: &str) -> bool {
    STOPWORDS.contains(&token)
}
