//! JavaScript evaluated inside rendered pages
//!
//! Each script returns a narrow, JSON-serializable shape that is decoded
//! with serde on the Rust side.

/// Collect `background-image` values from stylesheet rules.
///
/// Returns an array of raw property strings. At most 1000 rules are read
/// across all sheets; sheets that throw on `cssRules` (cross-origin) are
/// skipped individually.
pub const CSS_BACKGROUND_SCRIPT: &str = r#"
    (() => {
        const MAX_RULES = 1000;
        const values = [];
        let seen = 0;
        for (const sheet of Array.from(document.styleSheets)) {
            if (seen >= MAX_RULES) break;
            let rules;
            try {
                rules = sheet.cssRules;
            } catch (e) {
                continue;
            }
            if (!rules) continue;
            for (const rule of Array.from(rules)) {
                if (seen >= MAX_RULES) break;
                seen += 1;
                const bg = rule.style && rule.style.backgroundImage;
                if (bg && bg !== 'none') values.push(bg);
            }
        }
        return values;
    })()
"#;

/// Read routes declared by common single-page-app routers, plus the text
/// of a bounded number of inline scripts.
///
/// Returns `{ routes: string[], inlineScripts: string[] }`; missing router
/// globals simply contribute nothing.
pub const ROUTER_STATE_SCRIPT: &str = r#"
    (() => {
        const MAX_SCRIPTS = 50;
        const MAX_CHARS = 100000;
        const routes = [];
        const pushPath = (p) => { if (typeof p === 'string') routes.push(p); };

        try {
            const react = window.__REACT_ROUTER_STATE__;
            if (react && Array.isArray(react.routes)) {
                react.routes.forEach(r => pushPath(r && r.path));
            }
        } catch (e) {}

        try {
            const vue = window.__VUE_ROUTER__;
            if (vue && vue.options && Array.isArray(vue.options.routes)) {
                vue.options.routes.forEach(r => pushPath(r && r.path));
            }
        } catch (e) {}

        try {
            const next = window.__NEXT_DATA__;
            if (next && next.pages && typeof next.pages === 'object') {
                Object.keys(next.pages).forEach(pushPath);
            }
        } catch (e) {}

        const inlineScripts = [];
        const scripts = Array.from(document.querySelectorAll('script')).slice(0, MAX_SCRIPTS);
        for (const script of scripts) {
            const text = script.textContent || '';
            if (text.length > 0 && text.length <= MAX_CHARS) inlineScripts.push(text);
        }

        return { routes, inlineScripts };
    })()
"#;
