//! Names for anonymous parameters and results

use super::RawVar;
use crate::types::Var;
use std::collections::HashSet;

/// Name for the anonymous tuple entry at `index`.
///
/// The first anonymous `error` of a tuple becomes `err`; everything else is
/// `<prefix><index>` with the entry's original position.
pub fn synthesize_name(prefix: &str, index: usize, type_string: &str, err_used: &mut bool) -> String {
    if type_string == "error" && !*err_used {
        *err_used = true;
        "err".to_string()
    } else {
        format!("{prefix}{index}")
    }
}

/// Name every entry of a tuple. Explicit names are kept, except the blank
/// identifier which can be neither forwarded nor returned.
pub fn name_tuple(vars: Vec<RawVar>, prefix: &str) -> Vec<Var> {
    let mut taken = explicit_names(&vars);
    name_avoiding(vars, prefix, &mut taken)
}

/// Name parameters (`a<i>`) and results (`r<i>`) of one method so that no
/// synthesized name repeats a name used anywhere in its signature
pub fn name_signature(params: Vec<RawVar>, results: Vec<RawVar>) -> (Vec<Var>, Vec<Var>) {
    let mut taken = explicit_names(&params);
    taken.extend(explicit_names(&results));
    let params = name_avoiding(params, "a", &mut taken);
    let results = name_avoiding(results, "r", &mut taken);
    (params, results)
}

fn explicit_names(vars: &[RawVar]) -> HashSet<String> {
    vars.iter()
        .filter_map(|raw| raw.name.clone())
        .filter(|name| name != "_")
        .collect()
}

fn name_avoiding(vars: Vec<RawVar>, prefix: &str, taken: &mut HashSet<String>) -> Vec<Var> {
    let mut err_used = taken.contains("err");
    vars.into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let name = match raw.name {
                Some(name) if name != "_" => name,
                _ => {
                    let mut name = synthesize_name(prefix, index, &raw.type_string, &mut err_used);
                    while taken.contains(&name) {
                        name.push('_');
                    }
                    taken.insert(name.clone());
                    name
                }
            };
            Var {
                name,
                type_string: raw.type_string,
                variadic: raw.variadic,
            }
        })
        .collect()
}
