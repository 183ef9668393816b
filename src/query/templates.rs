//! GraphQL document templates, one per request kind.
//!
//! Whitespace inside the documents is insignificant to the server but kept
//! stable so identical parameters always render identical text.

/// File manifest selection shared by the full listing and the media listing.
const FILE_SET_FULL: &str = "fileSet {
                        edges {
                            node {
                                name,
                                size,
                                caption,
                                fileType,
                                isPublic,
                                uploadDone,
                                path,
                                isBackground,
                                number
                            }
                        }
                    }";

/// Bilingual description block, rendered once per language.
fn description_block(language: &str) -> String {
    format!(
        "{language} {{
                        generalDescription,
                        materialAndMake,
                        playingParts,
                        otherDetails
                    }}"
    )
}

/// Renders `value` as a GraphQL string literal.
///
/// JSON string escaping is valid GraphQL string syntax, so quotes and
/// backslashes inside `value` cannot terminate the literal.
pub(crate) fn string_literal(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

pub(crate) fn list_instruments(page: u32, limit: u32, filter: &str) -> String {
    let filter = string_literal(filter);
    let english = description_block("english");
    let filipino = description_block("filipino");
    format!(
        "
        {{
            instruments(page: {page}, limit: {limit}, filter: {filter}) {{
                page, pages, hasNext, hasPrev, objects {{
                    id,
                    controlNumber,
                    localName,
                    englishName,
                    alternateName,
                    thumbnail,
                    province {{ name }},
                    city {{ name }},
                    ethnolinguistic {{ name }},
                    hornbostel {{ name }},
                    length,
                    width,
                    height,
                    dimensionUnit,
                    diameter,
                    diameterUnit,
                    {english},
                    {filipino},
                    lastUpdated,
                    mediaUploadOngoing,
                    isReported,
                    {FILE_SET_FULL}
                }}
            }}
        }}
        "
    )
}

pub(crate) fn list_locations(page: u32, limit: u32) -> String {
    format!(
        "
        {{
            instruments(page: {page}, limit: {limit}) {{
                page,
                pages,
                hasNext,
                hasPrev,
                objects {{
                    id,
                    province {{
                        name,
                        region {{
                            name,
                            island {{ name }}
                        }}
                    }}
                }}
            }}
        }}
        "
    )
}

pub(crate) fn list_descriptions(page: u32, limit: u32) -> String {
    let english = description_block("english");
    let filipino = description_block("filipino");
    format!(
        "
        {{
            instruments(page: {page}, limit: {limit}) {{
                page,
                pages,
                hasNext,
                hasPrev,
                objects {{
                    id,
                    {english},
                    {filipino}
                }}
            }}
        }}
        "
    )
}

pub(crate) fn list_media_files(page: u32, limit: u32) -> String {
    format!(
        "
        {{
            instruments(page: {page}, limit: {limit}) {{
                page,
                pages,
                hasNext,
                hasPrev,
                objects {{
                    id,
                    localName,
                    {FILE_SET_FULL}
                }}
            }}
        }}
        "
    )
}

pub(crate) fn instrument_by_id(id: &str) -> String {
    let id = string_literal(id);
    format!(
        "
        {{
            instrument(id: {id}) {{
                controlNumber,
                localName,
                englishName,
                alternateName,
                fileSet {{
                    edges {{
                        node {{
                            name,
                            path
                        }}
                    }}
                }}
            }}
        }}
        "
    )
}

pub(crate) const LIST_REGIONS: &str = "
        {
            regions {
                name
                island {
                    name
                }
            }
        }
        ";

pub(crate) const LIST_PROVINCES: &str = "
        {
            provinces {
                id,
                name
            }
        }
        ";
