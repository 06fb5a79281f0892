//! NSIS installer script template.
//!
//! Rendered with Handlebars. Paths containing a backslash directly before a
//! placeholder are passed in pre-joined, since `\{{` is an escape sequence.

pub const NSI_TEMPLATE: &str = r#"; {{product_name}} Windows Installer
!include "MUI2.nsh"
!include "LogicLib.nsh"

Name "{{product_name}} v{{version}}"
OutFile "{{out_file}}"
InstallDir "{{install_dir}}"
RequestExecutionLevel admin

!insertmacro MUI_PAGE_DIRECTORY
!insertmacro MUI_PAGE_INSTFILES
!insertmacro MUI_UNPAGE_CONFIRM
!insertmacro MUI_UNPAGE_INSTFILES
!insertmacro MUI_LANGUAGE "English"

Section "Install"
  SetOutPath "$INSTDIR"
{{#each files}}
{{#if this.target_dir}}
  CreateDirectory "{{this.target_dir}}"
  File "/oname={{this.oname}}" "{{this.name}}"
{{else}}
  File "{{this.name}}"
{{/if}}
{{/each}}

  ; Add to PATH
  ReadRegStr $0 HKCU "Environment" "PATH"
  ${If} $0 == ""
    StrCpy $0 "$INSTDIR"
  ${Else}
    StrCpy $0 "$0;$INSTDIR"
  ${EndIf}
  WriteRegExpandStr HKCU "Environment" "PATH" $0

  CreateDirectory "{{start_menu}}"
  CreateShortCut "{{shortcut_path}}" "{{binary_path}}"
  CreateShortCut "{{start_menu}}\Uninstall.lnk" "{{uninstaller_path}}"

  WriteUninstaller "{{uninstaller_path}}"
  MessageBox MB_OK "{{product_name}} installed!$\n$\nDon't forget to install NASM:$\n{{assembler_url}}"
SectionEnd

Section "Uninstall"
  Delete "{{binary_path}}"
  Delete "{{uninstaller_path}}"
  RMDir /r "$INSTDIR"
  RMDir /r "{{start_menu}}"
SectionEnd
"#;
