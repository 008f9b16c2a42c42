//! User-visible message catalog.
//!
//! Every piece of copy the assistant sends lives here, in Portuguese, so
//! the engine and handlers never embed literal text. Menu bodies are built
//! from the catalog tables; instruction bodies interpolate the selected
//! indicator and unit.

use fhembot_types::catalog::{Catalog, IndicatorEntry, LookupTable, UnitEntry};
use fhembot_types::session::InfoSystem;

/// Public Power BI panel ("Painel Fhemig do Futuro").
pub const PANEL_URL: &str = "https://app.powerbi.com/view?r=eyJrIjoiZmY0NmIxZmYtMDdkMy00Yzg1LTkxY2ItZjBhOWEwMTJlNDVhIiwidCI6IjM4ZjAxMzYyLTRiMWMtNGU2ZS05MDE0LTAzN2M1ZDA0MTMyNyJ9";

/// Pentaho BI server, which also hosts the "Fhemig em Números" cubes.
pub const PENTAHO_URL: &str = "https://pentaho.fhemig.mg.gov.br:8080";

/// Information office contact address shown in instruction bodies.
pub const INFO_OFFICE_EMAIL: &str = "nucleo.informacao@fhemig.mg.gov.br";

/// Label of the catch-all menu entry.
pub const CATCH_ALL_LABEL: &str = "Outras informações";

/// Label of the virtual-assistant menu entry.
pub const ASSISTANT_LABEL: &str = "Falar com o assistente virtual";

// ---------------------------------------------------------------------------
// Fixed notices
// ---------------------------------------------------------------------------

/// Invalid input while picking a unit.
pub const UNIT_CHOICE_ERROR: &str = "Por favor, digite apenas o número da unidade desejada.";

/// Invalid input on any numbered menu past unit selection.
pub const INVALID_OPTION: &str =
    "Opção inválida, por favor, selecione uma das opções apresentadas.";

/// Served in the Initial state when the units catalog is empty.
pub const NO_UNITS: &str = "⚠️ No momento não há unidades configuradas no assistente. Por favor, entre em contato com o Núcleo de Informação pelo endereço: nucleo.informacao@fhemig.mg.gov.br.";

/// Generic fallback when session state cannot be read or written.
pub const TECHNICAL_DIFFICULTIES: &str = "⚠️ Estamos enfrentando dificuldades técnicas no momento. Por favor, tente novamente em instantes.";

/// Served when the answer provider fails, times out, or is disabled.
pub const ANSWER_FALLBACK: &str = "😕 Desculpe, não consegui consultar o assistente virtual neste momento. Por favor, tente novamente em instantes ou entre em contato com o Núcleo de Informação pelo endereço: nucleo.informacao@fhemig.mg.gov.br.";

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

/// Greeting plus the numbered unit list. This is both the first message a
/// new user sees and the re-prompt after an invalid unit choice.
pub fn unit_menu(display_name: &str, units: &LookupTable<UnitEntry>) -> String {
    let unit_list = units
        .iter()
        .map(|(i, unit)| format!("{i}. {}", unit.name))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Olá, {display_name}! 👋 Bem-vindo(a) ao Assistente Virtual da Fhemig!

Estou aqui para facilitar seu acesso às informações cruciais para seu dia a dia de trabalho. Vamos começar nossa jornada selecionando a sua unidade de trabalho.

Por favor, escolha o número correspondente à sua unidade na lista abaixo:

{unit_list}

Após a seleção, poderei te ajudar com:
• Consulta de indicadores específicos da sua unidade
• Acesso a relatórios e informações do sistema de gestão hospitalar
• Esclarecimento de dúvidas sobre os dados disponíveis

Estou animado para auxiliar você! Vamos lá, qual é o número da sua unidade? 😊"#
    )
}

/// Numbered indicator menu for a selected unit.
///
/// Positions mirror `routing::route`: panel indicators, dashboard
/// indicators, the catch-all entry, and the virtual-assistant entry.
pub fn indicator_menu(unit: &str, system: InfoSystem, catalog: &Catalog) -> String {
    let mut lines = Vec::new();
    for (i, indicator) in catalog.panel_indicators.iter() {
        lines.push(format!("{i}. {}", indicator.label));
    }
    let offset = catalog.panel_indicators.len();
    for (i, indicator) in catalog.numbers_indicators.iter() {
        lines.push(format!("{}. {}", offset + i, indicator.label));
    }
    let catch_all = offset + catalog.numbers_indicators.len() + 1;
    lines.push(format!("{catch_all}. {CATCH_ALL_LABEL}"));
    let assistant = catch_all + 1;
    lines.push(format!("{assistant}. {ASSISTANT_LABEL}"));
    let menu = lines.join("\n");

    format!(
        r#"Obrigado!

Você selecionou a unidade {unit}, que utiliza o sistema {system}.

Agora, vamos acessar as informações mais relevantes para você.

Por favor, selecione o número correspondente ao indicador que você deseja consultar:

{menu}

Digite apenas o número da sua escolha (1-{assistant}).

Após sua seleção, lhe informarei como acessar essa informação nas fontes oficiais da Fhemig.

Se você precisar de informações não listadas aqui, a opção "{CATCH_ALL_LABEL}" está disponível para atender às suas necessidades específicas.

Estou aqui para ajudar! Qual informação você precisa? 📊"#
    )
}

/// Options after an instruction or answer has been served.
pub fn feedback_menu() -> &'static str {
    r#"**Escolha uma das opções abaixo:**

1️⃣ Solicitar informações sobre outro tópico
2️⃣ Enviar uma nova mensagem ao Núcleo de Informação
3️⃣ Encerrar nossa conversa

**Por favor, digite o número da sua escolha (1-3):**"#
}

// ---------------------------------------------------------------------------
// Instruction bodies
// ---------------------------------------------------------------------------

/// Power BI panel instructions for one panel indicator.
pub fn future_panel_instructions(indicator: &str, unit: &str) -> String {
    format!(
        r#"Para visualizar o indicador **{indicator}** para a unidade **{unit}**, siga estas instruções:

1. Acesse o [Painel Fhemig do Futuro]({PANEL_URL})
2. Na barra superior, selecione sua unidade
3. Procure pelo indicador '{indicator}' no painel

Se você tiver dificuldades para encontrar o indicador, entre em contato com o Núcleo de Informação, por meio do endereço: {INFO_OFFICE_EMAIL}."#
    )
}

/// Step-by-step "Fhemig em Números" query instructions for one dashboard
/// indicator.
pub fn numbers_instructions(indicator: &str, unit: &str) -> String {
    format!(
        r#"Para visualizar o indicador **{indicator}** para a unidade **{unit}**, siga estas instruções:

1. Acesse o **[Fhemig em Números]({PENTAHO_URL})**
2. Clique em 'Create a new query'
3. Selecione o cubo 'Atendimentos'
4. Selecione o indicador '{indicator}'
5. Clique no campo 'Datas'
6. Arraste o campo 'Mês' para o espaço com título 'Colunas' na tela principal
7. Arraste também o campo 'Ano'
8. Dentro do campo 'Colunas', na tela, clique em 'Ano' duas vezes
9. Escolha os anos desejados
10. Clique em '>'
11. Clique em 'OK'
12. Agora, de novo no canto inferior esquerdo, clique na setinha com campo 'Hospitais'
13. Agora no campo 'Linhas', arraste para lá o campo 'Hospitais' que foi aberto
14. Clique em 'Hospital' duas vezes para abrir o filtro
15. Selecione '{unit}'
16. Clique em '>'
17. Clique em 'OK'"#
    )
}

/// Pentaho access instructions, the catch-all for SIGH units. The validated
/// SIGH report list is appended when the catalog has one.
pub fn reporting_tool_instructions(unit: &str, reports: &LookupTable<IndicatorEntry>) -> String {
    let mut body = format!(
        r#"Para acessar outras informações sobre a **{unit}**, acesse o **[Pentaho]({PENTAHO_URL})**.

## Não possui acesso?

Caso ainda não possua acesso ao Pentaho, entre em contato com o Núcleo de Informação, por meio do endereço: {INFO_OFFICE_EMAIL}, solicitando o acesso e informando:

* Nome completo do usuário
* Unidade
* Setor

## Já tem login e senha?

1. Acesse o [Pentaho]({PENTAHO_URL})
2. Clique em 'Login'
3. Insira o login e senha do Pentaho
4. Clique em 'Entrar'"#
    );
    append_report_list(&mut body, reports);
    body
}

/// Tasy report-module instructions. Serves both the dashboard range and the
/// catch-all for Tasy units; the validated report list is appended when the
/// catalog has one.
pub fn hospital_system_instructions(
    unit: &str,
    system: InfoSystem,
    reports: &LookupTable<IndicatorEntry>,
) -> String {
    let mut body = format!(
        r#"Para acessar outras informações sobre a **{unit}**, que utiliza o {system}, acesse o módulo de relatórios do sistema.

Para acessar os relatórios do Tasy, siga os passos abaixo:

## Acessando os relatórios

1. Na tela inicial, clique na aba 'Utilitários'
2. Selecione a funcionalidade 'Impressão de Relatórios'
3. Na janela que se abrir, insira no campo título o termo **FHEMIG - NI**
4. Clique em 'Filtrar'
5. Na janela do lado direito, clique duas vezes sobre o nome do relatório desejado
6. Preencha os campos indicados na tela
7. Clique no botão 'Exportar XLS'
8. Na tela seguinte, clique no botão 'Continuar'
9. O download iniciará no canto superior direito da tela
10. Clique no botão 'Manter' após o início do download
11. O documento será salvo na pasta de downloads do seu computador

## Observações importantes

* Utilize apenas relatórios com título 'FHEMIG - NI', pois estes foram validados pelo Núcleo de Informação
* Após baixar o relatório, avalie se a estrutura está adequada e se os dados não apresentam problemas aparentes
* Informe no histórico da ordem de serviço se são necessários ajustes ou se o relatório está aprovado

## Não encontrou o relatório que precisava?

Procure a referência de informação da sua unidade para solicitar a criação de novo relatório."#
    );
    append_report_list(&mut body, reports);
    body
}

fn append_report_list(body: &mut String, reports: &LookupTable<IndicatorEntry>) {
    if reports.is_empty() {
        return;
    }
    body.push_str("\n\n## Relatórios disponíveis\n");
    for (_, report) in reports.iter() {
        body.push_str(&format!("\n* {}", report.label));
    }
}

// ---------------------------------------------------------------------------
// Escalation to the information office
// ---------------------------------------------------------------------------

/// Prompt for the free-text message to forward to the information office.
pub fn escalation_prompt() -> &'static str {
    r#"✍️ **Pode escrever!**

Digite abaixo a mensagem que você deseja enviar ao Núcleo de Informação. Inclua o máximo de detalhes possível (indicador, período, unidade) para agilizar a resposta.

Assim que receber sua mensagem, eu a encaminho diretamente à equipe. 📨"#
}

/// Confirmation after the forward was delivered.
pub fn escalation_confirmation(display_name: &str) -> String {
    format!(
        r#"✅ **Ótimo, {display_name}!**
Sua mensagem foi enviada com sucesso ao Núcleo de Informação.

📬 **Confirmação:**
• **Destinatário:** Núcleo de Informação
• **Status:** Enviado
• **Prazo de resposta estimado:** Em breve

Fique tranquilo(a), um membro da equipe analisará sua solicitação e entrará em contato o mais rápido possível. Enquanto isso, há algo mais em que eu possa ajudar?

**Escolha uma das opções abaixo:**

1️⃣ Solicitar informações sobre outro tópico
2️⃣ Enviar uma nova mensagem ao Núcleo de Informação
3️⃣ Encerrar nossa conversa

💡 **Dica:** Se lembrar de algum detalhe adicional importante, você pode escolher a opção 2 para enviar uma nova mensagem complementar.

**Por favor, digite o número da sua escolha (1-3):**"#
    )
}

/// Served instead of the confirmation when the forward could not be
/// delivered; the message stays buffered on the session.
pub fn escalation_failure() -> String {
    format!(
        r#"⚠️ **Não foi possível entregar sua mensagem ao Núcleo de Informação.**

O sistema de mensagens está instável neste momento. Sua mensagem ficou registrada; escolha a opção 2 para tentar o envio novamente em instantes.

{}"#,
        feedback_menu()
    )
}

// ---------------------------------------------------------------------------
// Virtual assistant
// ---------------------------------------------------------------------------

/// Prompt for the question to hand to the virtual assistant.
pub fn question_prompt() -> &'static str {
    r#"🤖 **Assistente Virtual da Fhemig**

Pode perguntar! Digite abaixo sua dúvida sobre os sistemas, indicadores ou relatórios da Fhemig e eu farei o possível para ajudar."#
}

// ---------------------------------------------------------------------------
// Closing
// ---------------------------------------------------------------------------

/// Farewell on feedback option 3.
pub fn closing_message() -> &'static str {
    r#"Obrigado por utilizar o Assistente Virtual da Fhemig! 👋

Foi um prazer ajudar você hoje com informações e orientações sobre nossos sistemas e indicadores. Espero que nossa interação tenha sido útil e esclarecedora.

🔑 **Pontos-chave para lembrar:**
• O Painel Fhemig do Futuro está sempre disponível para consultas rápidas
• O Fhemig em Números oferece análises detalhadas e personalizáveis
• Os sistemas de gestão hospitalares contêm relatórios importantes
• O Núcleo de Informação está à disposição para dúvidas mais complexas

💡 **Dica:** Mantenha-se atualizado sobre novos recursos e relatórios. Eles são frequentemente adicionados para melhorar nossa gestão de informações!

Se surgir qualquer dúvida adicional, não hesite em iniciar uma nova conversa. Estou aqui 24/7 para auxiliar você em suas necessidades de informação.

Desejo um excelente dia e sucesso em suas atividades na Fhemig! 🏥📊

**Até a próxima!**"#
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units() -> LookupTable<UnitEntry> {
        LookupTable::from_entries(vec![
            UnitEntry {
                name: "Hospital João XXIII".to_string(),
                system: InfoSystem::Sigh,
            },
            UnitEntry {
                name: "Hospital Regional Antônio Dias".to_string(),
                system: InfoSystem::Tasy,
            },
        ])
    }

    fn small_catalog() -> Catalog {
        let mut c = Catalog::empty();
        c.panel_indicators = LookupTable::from_entries(vec![
            IndicatorEntry {
                label: "Taxa de Ocupação Hospitalar".to_string(),
            },
            IndicatorEntry {
                label: "Número de Cirurgias".to_string(),
            },
        ]);
        c.numbers_indicators = LookupTable::from_entries(vec![IndicatorEntry {
            label: "Taxa de Mortalidade Institucional".to_string(),
        }]);
        c
    }

    #[test]
    fn test_unit_menu_lists_units_in_order() {
        let menu = unit_menu("Ana", &units());
        assert!(menu.contains("Olá, Ana!"));
        assert!(menu.contains("1. Hospital João XXIII"));
        assert!(menu.contains("2. Hospital Regional Antônio Dias"));
    }

    #[test]
    fn test_indicator_menu_positions_follow_catalog() {
        let menu = indicator_menu("Hospital João XXIII", InfoSystem::Sigh, &small_catalog());
        assert!(menu.contains("1. Taxa de Ocupação Hospitalar"));
        assert!(menu.contains("2. Número de Cirurgias"));
        assert!(menu.contains("3. Taxa de Mortalidade Institucional"));
        assert!(menu.contains("4. Outras informações"));
        assert!(menu.contains("5. Falar com o assistente virtual"));
        assert!(menu.contains("(1-5)"));
        assert!(menu.contains("sistema SIGH"));
    }

    #[test]
    fn test_panel_instructions_interpolate_indicator_and_unit() {
        let body = future_panel_instructions("Número de Internações", "Hospital João XXIII");
        assert!(body.contains("**Número de Internações**"));
        assert!(body.contains("**Hospital João XXIII**"));
        assert!(body.contains(PANEL_URL));
        assert!(body.contains(INFO_OFFICE_EMAIL));
    }

    #[test]
    fn test_numbers_instructions_reference_dashboard() {
        let body = numbers_instructions("Taxa de Ocupação Hospitalar", "Hospital João XXIII");
        assert!(body.contains("Fhemig em Números"));
        assert!(body.contains(PENTAHO_URL));
        assert!(body.contains("17. Clique em 'OK'"));
    }

    #[test]
    fn test_report_list_appended_when_present() {
        let reports = LookupTable::from_entries(vec![IndicatorEntry {
            label: "FHEMIG - NI - Atendimentos por Setor".to_string(),
        }]);
        let body = hospital_system_instructions("Casa de Saúde Santa Fé", InfoSystem::Tasy, &reports);
        assert!(body.contains("## Relatórios disponíveis"));
        assert!(body.contains("* FHEMIG - NI - Atendimentos por Setor"));

        let without = hospital_system_instructions(
            "Casa de Saúde Santa Fé",
            InfoSystem::Tasy,
            &LookupTable::empty(),
        );
        assert!(!without.contains("## Relatórios disponíveis"));
    }

    #[test]
    fn test_escalation_confirmation_addresses_user() {
        let body = escalation_confirmation("Carlos Drummond");
        assert!(body.contains("Ótimo, Carlos Drummond!"));
        assert!(body.contains("3️⃣ Encerrar nossa conversa"));
    }

    #[test]
    fn test_escalation_failure_keeps_menu_visible() {
        let body = escalation_failure();
        assert!(body.contains("Não foi possível entregar"));
        assert!(body.contains("1️⃣ Solicitar informações"));
    }
}
