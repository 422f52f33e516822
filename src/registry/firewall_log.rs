//! Web-firewall logs (one JSON document per request).

use super::SerdeSpec;

pub const JSON_SERDE: &str = "org.openx.data.jsonserde.JsonSerDe";

pub const COLUMNS: &[(&str, &str)] = &[
    ("timestamp", "bigint"),
    ("formatversion", "int"),
    ("webaclid", "string"),
    ("terminatingruleid", "string"),
    ("terminatingruletype", "string"),
    ("action", "string"),
    (
        "terminatingrulematchdetails",
        "array<struct<conditiontype:string,sensitivitylevel:string,location:string,matcheddata:array<string>>>",
    ),
    ("httpsourcename", "string"),
    ("httpsourceid", "string"),
    (
        "rulegrouplist",
        "array<struct<rulegroupid:string,terminatingrule:struct<ruleid:string,action:string,rulematchdetails:array<struct<conditiontype:string,sensitivitylevel:string,location:string,matcheddata:array<string>>>>,nonterminatingmatchingrules:array<struct<ruleid:string,action:string,overriddenaction:string,rulematchdetails:array<struct<conditiontype:string,sensitivitylevel:string,location:string,matcheddata:array<string>>>,challengeresponse:struct<responsecode:string,solvetimestamp:string>,captcharesponse:struct<responsecode:string,solvetimestamp:string>>>,excludedrules:string>>",
    ),
    (
        "ratebasedrulelist",
        "array<struct<ratebasedruleid:string,limitkey:string,maxrateallowed:int>>",
    ),
    // Differs from the published string by one trailing `>`; the published one is unbalanced.
    (
        "nonterminatingmatchingrules",
        "array<struct<ruleid:string,action:string,rulematchdetails:array<struct<conditiontype:string,sensitivitylevel:string,location:string,matcheddata:array<string>>>,challengeresponse:struct<responsecode:string,solvetimestamp:string>,captcharesponse:struct<responsecode:string,solvetimestamp:string>>>",
    ),
    (
        "requestheadersinserted",
        "array<struct<name:string,value:string>>",
    ),
    ("responsecodesent", "string"),
    (
        "httprequest",
        "struct<clientip:string,country:string,headers:array<struct<name:string,value:string>>,uri:string,args:string,httpversion:string,httpmethod:string,requestid:string,fragment:string,scheme:string,host:string>",
    ),
    ("labels", "array<struct<name:string>>"),
    (
        "captcharesponse",
        "struct<responsecode:string,solvetimestamp:string,failurereason:string>",
    ),
    (
        "challengeresponse",
        "struct<responsecode:string,solvetimestamp:string,failurereason:string>",
    ),
    ("ja3fingerprint", "string"),
    ("ja4fingerprint", "string"),
    ("oversizefields", "string"),
    ("requestbodysize", "int"),
    ("requestbodysizeinspectedbywaf", "int"),
];

/// The JSON SerDe takes no parameters and the catalog infers the text formats.
pub fn json_serde() -> SerdeSpec {
    SerdeSpec::new(JSON_SERDE)
}
