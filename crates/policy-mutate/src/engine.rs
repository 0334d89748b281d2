//! Mutation application.

use crate::{JsonEdit, JsonOp, MissingPath, MutateError, Mutation, Result};
use policy_json::JsonPathError;
use policy_model::{Action, Request, Response, Session};
use serde_json::Value;
use tracing::debug;

/// Outcome of applying one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The chain may continue.
    Continue,
    /// A blocking action was set; the chain must stop here, and no
    /// later-matched rule may run for this event.
    Blocked,
}

/// Applies one mutation to a TLS session descriptor.
pub fn apply_session(mutation: &Mutation, session: &mut Session) -> Result<Applied> {
    match mutation {
        Mutation::SetServerAddr(addr) => {
            session.server_addr = addr.clone();
            session.action = Action::Modify;
            Ok(Applied::Continue)
        }
        Mutation::Block(kind) => {
            session.action = kind.action();
            Ok(Applied::Blocked)
        }
        other => Err(not_applicable(other, "session")),
    }
}

/// Applies one mutation to a request descriptor.
pub fn apply_request(mutation: &Mutation, request: &mut Request) -> Result<Applied> {
    match mutation {
        Mutation::SetPath(path) => {
            request.path = path.clone();
            request.action = Action::Modify;
            Ok(Applied::Continue)
        }
        Mutation::SetHeader { name, value } => {
            request.header.insert(name.clone(), value.clone());
            request.action = Action::Modify;
            Ok(Applied::Continue)
        }
        Mutation::RemoveHeader { name } => {
            request.header.remove(name);
            request.action = Action::Modify;
            Ok(Applied::Continue)
        }
        Mutation::Block(kind) => {
            request.action = kind.action();
            Ok(Applied::Blocked)
        }
        other => Err(not_applicable(other, "request")),
    }
}

/// Applies one mutation to a response descriptor.
///
/// `missing` is the owning rule's strictness for absent JSON paths.
pub fn apply_response(
    mutation: &Mutation,
    response: &mut Response,
    missing: MissingPath,
) -> Result<Applied> {
    match mutation {
        Mutation::SetStatus(status) => {
            response.status = *status;
        }
        Mutation::SetHeader { name, value } => {
            response.header.insert(name.clone(), value.clone());
        }
        Mutation::RemoveHeader { name } => {
            response.header.remove(name);
        }
        Mutation::SetBody(body) => {
            response.body = body.clone();
        }
        Mutation::AppendBody(tail) => {
            response.body.push_str(tail);
        }
        Mutation::SpliceBody {
            marker,
            replacement,
        } => {
            response.body = splice(&response.body, marker, replacement)?;
        }
        Mutation::InjectScript {
            marker,
            replacement,
            preamble,
        } => {
            let spliced = splice(&response.body, marker, replacement)?;
            response.body = format!("{preamble}\n{spliced}");
        }
        Mutation::EditJson { edits } => {
            edit_json(&mut response.body, edits, missing)?;
        }
        Mutation::Block(kind) => {
            response.action = kind.action();
            return Ok(Applied::Blocked);
        }
        other => return Err(not_applicable(other, "response")),
    }
    response.action = Action::Modify;
    Ok(Applied::Continue)
}

/// Replaces the first occurrence of `marker` in `body`.
fn splice(body: &str, marker: &str, replacement: &str) -> Result<String> {
    if !body.contains(marker) {
        return Err(MutateError::MarkerNotFound {
            marker: marker.to_string(),
        });
    }
    Ok(body.replacen(marker, replacement, 1))
}

/// Decodes `body`, applies the edits in order, re-encodes.
///
/// With `MissingPath::Skip`, an absent path drops only that edit; a
/// body that is not JSON, or an append against a non-array, fails the
/// whole mutation either way.
fn edit_json(body: &mut String, edits: &[JsonEdit], missing: MissingPath) -> Result<()> {
    let mut doc: Value = serde_json::from_str(body).map_err(MutateError::InvalidJsonBody)?;
    for edit in edits {
        let outcome = match &edit.op {
            JsonOp::Set(value) => policy_json::set(&mut doc, &edit.path, value.clone()),
            JsonOp::Append(value) => policy_json::append(&mut doc, &edit.path, value.clone()),
        };
        match outcome {
            Ok(()) => {}
            Err(JsonPathError::PathNotFound { path }) if missing == MissingPath::Skip => {
                debug!(%path, "skipping JSON edit for absent path");
            }
            Err(err) => return Err(err.into()),
        }
    }
    // Display-encoding a Value cannot fail, and preserve_order keeps
    // untouched fields byte-stable.
    *body = doc.to_string();
    Ok(())
}

fn not_applicable(mutation: &Mutation, event: &'static str) -> MutateError {
    MutateError::NotApplicable {
        mutation: mutation.kind(),
        event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockKind;
    use policy_model::Method;
    use serde_json::json;

    fn response(host: &str, path: &str, body: &str) -> Response {
        Response::new(Request::new(Method::Get, host, path), 200, body)
    }

    fn edit(path: &str, op: JsonOp) -> JsonEdit {
        JsonEdit {
            path: path.parse().unwrap(),
            op,
        }
    }

    #[test]
    fn test_set_server_addr() {
        let mut session = Session::for_sni("api.opendns.com");
        let applied = apply_session(
            &Mutation::SetServerAddr("static.tharow.net:443".to_string()),
            &mut session,
        )
        .unwrap();
        assert_eq!(applied, Applied::Continue);
        assert_eq!(session.server_addr, "static.tharow.net:443");
        assert_eq!(session.action, Action::Modify);
    }

    #[test]
    fn test_session_rejects_response_mutation() {
        let mut session = Session::for_sni("x");
        let err = apply_session(&Mutation::SetStatus(200), &mut session).unwrap_err();
        assert!(matches!(err, MutateError::NotApplicable { .. }));
    }

    #[test]
    fn test_request_path_rewrite() {
        let mut request = Request::new(Method::Get, "ustats-app.schoology.com", "/x");
        apply_request(&Mutation::SetPath("/null.js".to_string()), &mut request).unwrap();
        assert_eq!(request.path, "/null.js");
        assert_eq!(request.action, Action::Modify);
    }

    #[test]
    fn test_request_block_short_circuits() {
        let mut request = Request::new(Method::Post, "utica.schoology.com", "/usage/collect");
        let applied = apply_request(&Mutation::Block(BlockKind::Block), &mut request).unwrap();
        assert_eq!(applied, Applied::Blocked);
        assert_eq!(request.action, Action::Block);
    }

    #[test]
    fn test_response_synthetic_body() {
        let mut res = response("meetlookup.com", "/geolocation/", "<html>geo</html>");
        apply_response(&Mutation::SetStatus(200), &mut res, MissingPath::Fail).unwrap();
        apply_response(
            &Mutation::SetHeader {
                name: "Content-Type".to_string(),
                value: "text/plain".to_string(),
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        apply_response(&Mutation::SetBody("US".to_string()), &mut res, MissingPath::Fail).unwrap();
        assert_eq!(res.status, 200);
        assert_eq!(res.body, "US");
        assert_eq!(res.header["Content-Type"], "text/plain");
        assert_eq!(res.action, Action::Modify);
    }

    #[test]
    fn test_remove_header() {
        let mut res = response("a.example", "/", "");
        res.header
            .insert("Access-Control-Allow-Origin".to_string(), "none".to_string());
        apply_response(
            &Mutation::RemoveHeader {
                name: "Access-Control-Allow-Origin".to_string(),
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        assert!(!res.header.contains_key("Access-Control-Allow-Origin"));
    }

    #[test]
    fn test_append_body() {
        let mut res = response("ustats-app.schoology.com", "/data/guide.js", "var g=1;");
        apply_response(
            &Mutation::AppendBody("pendo.designerEnabled=true;".to_string()),
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        assert_eq!(res.body, "var g=1;pendo.designerEnabled=true;");
    }

    #[test]
    fn test_splice_body_first_occurrence_only() {
        let mut res = response("ui.schoology.com", "/bundle.js", "a;B=R.props;b;B=R.props;");
        apply_response(
            &Mutation::SpliceBody {
                marker: "B=R.props".to_string(),
                replacement: "B=reconfig(R.props)".to_string(),
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        assert_eq!(res.body, "a;B=reconfig(R.props);b;B=R.props;");
    }

    #[test]
    fn test_splice_missing_marker_fails() {
        let mut res = response("ui.schoology.com", "/bundle.js", "no marker here");
        let err = apply_response(
            &Mutation::SpliceBody {
                marker: "B=R.props".to_string(),
                replacement: "x".to_string(),
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, MutateError::MarkerNotFound { .. }));
        assert_eq!(res.body, "no marker here");
    }

    #[test]
    fn test_inject_script_prepends_preamble() {
        let mut res = response("ui.schoology.com", "/bundle.js", "B=R.props;run();");
        apply_response(
            &Mutation::InjectScript {
                marker: "B=R.props".to_string(),
                replacement: "B=reconfig(R.props)".to_string(),
                preamble: "function reconfig(x){return x}".to_string(),
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        assert_eq!(
            res.body,
            "function reconfig(x){return x}\nB=reconfig(R.props);run();"
        );
    }

    #[test]
    fn test_edit_json_set_and_append() {
        let mut res = response(
            "nodeapi.classlink.com",
            "/applibrary/dashboard",
            r#"{"enterprisecategories":[{"Id":1}]}"#,
        );
        apply_response(
            &Mutation::EditJson {
                edits: vec![edit(
                    "enterprisecategories",
                    JsonOp::Append(json!({"Id":5901,"Name":"Tharow","TenantWide":1})),
                )],
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        let doc: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(doc["enterprisecategories"][1]["Id"], json!(5901));
    }

    #[test]
    fn test_edit_json_invalid_body() {
        let mut res = response("nodeapi.classlink.com", "/help", "<html>not json</html>");
        let err = apply_response(
            &Mutation::EditJson {
                edits: vec![edit("HelpLinkURL", JsonOp::Set(json!("x")))],
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, MutateError::InvalidJsonBody(_)));
    }

    #[test]
    fn test_edit_json_strict_missing_path() {
        let mut res = response("myapps.classlink.io", "/settings/v1p0/settings", r#"{"data":{}}"#);
        let err = apply_response(
            &Mutation::EditJson {
                edits: vec![edit("data.tenantSettings.customLogo", JsonOp::Set(json!("x")))],
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap_err();
        assert!(matches!(err, MutateError::JsonPathNotFound { .. }));
    }

    #[test]
    fn test_edit_json_skip_missing_path() {
        let mut res = response("myapps.classlink.io", "/settings/v1p0/settings", r#"{"data":{}}"#);
        apply_response(
            &Mutation::EditJson {
                edits: vec![
                    edit("data.tenantSettings.customLogo", JsonOp::Set(json!("x"))),
                    edit("data.present", JsonOp::Set(json!(1))),
                ],
            },
            &mut res,
            MissingPath::Skip,
        )
        .unwrap();
        let doc: Value = serde_json::from_str(&res.body).unwrap();
        assert_eq!(doc, json!({"data":{"present":1}}));
    }

    #[test]
    fn test_edit_json_preserves_untouched_order() {
        let mut res = response(
            "myapps.classlink.io",
            "/settings/v1p0/myClassesEnabled",
            r#"{"zeta":1,"data":{"myClassesEnabled":false},"alpha":2}"#,
        );
        apply_response(
            &Mutation::EditJson {
                edits: vec![edit("data.myClassesEnabled", JsonOp::Set(json!(true)))],
            },
            &mut res,
            MissingPath::Fail,
        )
        .unwrap();
        assert_eq!(
            res.body,
            r#"{"zeta":1,"data":{"myClassesEnabled":true},"alpha":2}"#
        );
    }

    #[test]
    fn test_mutations_idempotent_on_own_output() {
        let mut res = response("meetlookup.com", "/geolocation/", "old");
        let mutation = Mutation::SetBody("US".to_string());
        apply_response(&mutation, &mut res, MissingPath::Fail).unwrap();
        let once = res.clone();
        apply_response(&mutation, &mut res, MissingPath::Fail).unwrap();
        assert_eq!(res, once);
    }
}
