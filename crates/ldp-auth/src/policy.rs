//! Web Access Control vocabulary and policy documents.

use ldp_types::{AccessMode, ResourceIdentifier};

pub const ACL: &str = "http://www.w3.org/ns/auth/acl#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";

pub const ACL_MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
pub const ACL_AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
pub const ACL_AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
pub const ACL_ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
pub const ACL_DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";

/// Agent class matching every caller, anonymous ones included.
pub const PUBLIC_AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";

/// Agent classes matching any authenticated caller.
pub const AUTHENTICATED_AGENTS: [&str; 2] = [
    "http://www.w3.org/ns/auth/acl#AuthenticatedAgent",
    "http://xmlns.com/foaf/0.1/AuthenticatedAgent",
];

/// IRI of an access mode.
pub fn mode_iri(mode: AccessMode) -> String {
    format!("{ACL}{}", mode.local_name())
}

/// Policy granting the public agent class every mode on `container` and,
/// by default, on everything below it. `acl` is the document the policy is
/// stored at; it is named as well so the policy stays editable.
pub fn public_container_policy(container: &ResourceIdentifier, acl: &ResourceIdentifier) -> String {
    format!(
        "@prefix acl: <{ACL}> .\n\
         @prefix foaf: <{FOAF}> .\n\
         \n\
         <#authorization>\n    \
             a acl:Authorization ;\n    \
             acl:agentClass foaf:Agent ;\n    \
             acl:mode acl:Read, acl:Write, acl:Append, acl:Control ;\n    \
             acl:accessTo <{container}>, <{acl}> ;\n    \
             acl:default <{container}> .\n"
    )
}
